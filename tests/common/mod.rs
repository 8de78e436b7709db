// Allow dead_code because these helpers are used across different test files
// which are compiled separately
#![allow(dead_code)]

use std::fs;
use std::path::PathBuf;

use anyhow::Result;
use billbook::LedgerConfig;
use billbook::application::LedgerService;
use tempfile::TempDir;

/// Ledger format using English headings and labels.
pub fn english_config() -> LedgerConfig {
    LedgerConfig {
        start_marker: "## 1. daily income/expense".into(),
        end_marker: "## 2. income/expense summary".into(),
        date_prefix: "### ".into(),
        header_label: "category 1".into(),
        separator_token: ":----:".into(),
        field_delimiter: '|',
        tag_delimiter: ',',
        expense_label: "expense".into(),
        income_label: "income".into(),
    }
}

pub fn english_service() -> LedgerService {
    LedgerService::new(english_config())
}

/// Write `contents` to a ledger file inside a fresh temporary directory.
pub fn write_ledger(contents: &str) -> Result<(PathBuf, TempDir)> {
    let temp_dir = TempDir::new()?;
    let path = temp_dir.path().join("03.md");
    fs::write(&path, contents)?;
    Ok((path, temp_dir))
}

/// Test fixture: a month of entries in the English format, with content
/// before the start marker and after the end marker.
pub const MARCH_LEDGER: &str = "\
# 2023-03

Notes before the table are ignored.
| expense | food | | 999 | outside the region |

## 1. daily income/expense

### 2023-03-01

| category 1 | category 2 | tags | amount | description |
| :----: | :----: | :----: | :----: | :----: |
| expense | food | snack | 15.50 | lunch |
| income | salary |  | 3000 | pay |

### 2023-03-02

| category 1 | category 2 | tags | amount | description |
| :----: | :----: | :----: | :----: | :----: |
| expense | transport | metro,bus | 4.20 | commute |
| expense | food | dinner | 38 | noodles |
| transfer | savings | | 500 | moved to savings |
| income | refund | | 12.5 | returned order |

## 2. income/expense summary

| expense | food | | 1000 | after the end marker |
not | a | valid row
";

/// The same kind of ledger in the default format.
pub const DEFAULT_FORMAT_LEDGER: &str = "\
## 1. 日常收支

### 2023-03-05

| 分类 1 | 分类 2 | 标签 | 金额 | 说明 |
| :----: | :----: | :----: | :----: | :----: |
| 支出 | 餐饮 | 早餐、咖啡 | 22.80 | 便利店 |
| 收入 | 工资 |  | 8000 | 三月工资 |

## 2. 收支汇总
";
