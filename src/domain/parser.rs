use tracing::{debug, info, warn};

use super::{DateSections, LedgerConfig, LedgerError, TransactionRecord};

/// Where the parser is relative to the region bounded by the start and end markers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseState {
    /// Before the start marker. Only the start marker is recognized.
    Outside,
    /// Between the markers. Lines are date headers or table rows.
    InsideSection,
    /// End marker seen. Terminal.
    Done,
}

/// Line-at-a-time parser turning a bill log into [`DateSections`].
///
/// Drive it with [`LedgerParser::feed`] and stop once it reports
/// [`ParseState::Done`], or use [`parse_lines`] for a whole document.
pub struct LedgerParser<'a> {
    config: &'a LedgerConfig,
    state: ParseState,
    current_date: Option<String>,
    sections: DateSections,
    line_number: usize,
}

impl<'a> LedgerParser<'a> {
    pub fn new(config: &'a LedgerConfig) -> Self {
        Self {
            config,
            state: ParseState::Outside,
            current_date: None,
            sections: DateSections::new(),
            line_number: 0,
        }
    }

    pub fn state(&self) -> ParseState {
        self.state
    }

    pub fn current_date(&self) -> Option<&str> {
        self.current_date.as_deref()
    }

    /// Consume one raw line and return the state after it.
    ///
    /// Lines fed after `Done` are counted but otherwise ignored.
    pub fn feed(&mut self, raw: &str) -> Result<ParseState, LedgerError> {
        self.line_number += 1;
        let line = raw.trim();
        if line.is_empty() {
            return Ok(self.state);
        }

        self.state = match self.state {
            ParseState::Outside => self.step_outside(line),
            ParseState::InsideSection => self.step_inside(line)?,
            ParseState::Done => ParseState::Done,
        };
        Ok(self.state)
    }

    /// Hand back the collected sections.
    pub fn finish(self) -> DateSections {
        if self.state == ParseState::Outside {
            warn!(
                marker = %self.config.start_marker,
                "start marker not found, no entries read"
            );
        }
        self.sections
    }

    fn step_outside(&self, line: &str) -> ParseState {
        if line.starts_with(self.config.start_marker.as_str()) {
            info!(line = self.line_number, "reading daily income/expense entries");
            ParseState::InsideSection
        } else {
            ParseState::Outside
        }
    }

    fn step_inside(&mut self, line: &str) -> Result<ParseState, LedgerError> {
        if line.starts_with(self.config.end_marker.as_str()) {
            info!(line = self.line_number, "finished reading daily entries");
            return Ok(ParseState::Done);
        }
        if line.starts_with(self.config.start_marker.as_str()) {
            return Ok(ParseState::InsideSection);
        }

        if let Some(label) = line.strip_prefix(self.config.date_prefix.as_str()) {
            let label = label.to_string();
            if self.sections.insert(label.clone(), Vec::new()).is_some() {
                debug!(date = %label, "repeated date header, earlier rows dropped");
            }
            self.current_date = Some(label);
            return Ok(ParseState::InsideSection);
        }

        let Some(date) = self.current_date.as_deref() else {
            debug!(line = self.line_number, "row before any date header ignored");
            return Ok(ParseState::InsideSection);
        };

        if let Some(record) = parse_row(self.config, line, date, self.line_number)? {
            self.sections
                .entry(date.to_string())
                .or_default()
                .push(record);
        }
        Ok(ParseState::InsideSection)
    }
}

/// Parse a whole document. Lines after the end marker are never pulled
/// from the iterator.
pub fn parse_lines<I, S>(config: &LedgerConfig, lines: I) -> Result<DateSections, LedgerError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut parser = LedgerParser::new(config);
    for line in lines {
        if parser.feed(line.as_ref())? == ParseState::Done {
            break;
        }
    }
    Ok(parser.finish())
}

/// Convert one table row into a record.
///
/// Returns `Ok(None)` for the column-header and alignment rows. `date` and
/// `line` only feed the error.
pub fn parse_row(
    config: &LedgerConfig,
    row: &str,
    date: &str,
    line: usize,
) -> Result<Option<TransactionRecord>, LedgerError> {
    if is_decoration(config, row) {
        debug!(line, "table decoration row skipped");
        return Ok(None);
    }

    let fields: Vec<&str> = row.split(config.field_delimiter).collect();
    // fields[0] is whatever precedes the leading delimiter
    let [_, primary, secondary, tags, amount, description, ..] = fields.as_slice() else {
        return Err(LedgerError::MalformedRow {
            line,
            date: date.to_string(),
            row: row.to_string(),
        });
    };

    Ok(Some(TransactionRecord {
        primary_category: primary.to_string(),
        secondary_category: secondary.to_string(),
        tags: split_tags(tags, config.tag_delimiter),
        amount: amount.to_string(),
        description: description.to_string(),
    }))
}

fn is_decoration(config: &LedgerConfig, row: &str) -> bool {
    let contains = |marker: &str| !marker.is_empty() && row.contains(marker);
    contains(config.header_label.as_str()) || contains(config.separator_token.as_str())
}

fn split_tags(field: &str, delimiter: char) -> Vec<String> {
    field
        .split(delimiter)
        .map(str::trim)
        .filter(|tag| !tag.is_empty())
        .map(String::from)
        .collect()
}
