//! Context blocks handed to the model
//!
//! Three renderings, all plain text:
//!
//! - [`format_record`] for a customer found in the dataset,
//! - [`format_not_found`] when a recognised identifier has no record,
//! - [`format_dataset_summary`] for the dataset as a whole, included in
//!   every request.
//!
//! Record formatting is table-driven: [`RECORD_SECTIONS`] lists every label
//! and the column it reads. A missing value renders as [`MISSING`]; no label
//! is ever left out.

use crate::dataset::{Record, Statistics, DEFAULT_COLUMN, DEFAULT_MARKER, ID_COLUMN};
use std::fmt::Write;

/// Placeholder for a missing field
pub const MISSING: &str = "N/A";

/// How a column value is rendered
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// The value as written
    Text,
    /// The default flag, spelled out
    DefaultFlag,
}

/// One labelled line of a record block
#[derive(Debug, Clone, Copy)]
pub struct Field {
    /// Label shown to the model
    pub label: &'static str,
    /// Dataset column read for the value
    pub column: &'static str,
    /// Rendering rule
    pub kind: FieldKind,
}

const fn text(label: &'static str, column: &'static str) -> Field {
    Field {
        label,
        column,
        kind: FieldKind::Text,
    }
}

/// Sections of a record block, in display order
pub const RECORD_SECTIONS: &[(&str, &[Field])] = &[
    (
        "Financial Information",
        &[
            text("Income", "INCOME"),
            text("Savings", "SAVINGS"),
            text("Debt", "DEBT"),
            text("Credit Score", "CREDIT_SCORE"),
            Field {
                label: "Default Status",
                column: DEFAULT_COLUMN,
                kind: FieldKind::DefaultFlag,
            },
        ],
    ),
    (
        "Financial Ratios",
        &[
            text("Savings to Income Ratio", "R_SAVINGS_INCOME"),
            text("Debt to Income Ratio", "R_DEBT_INCOME"),
            text("Debt to Savings Ratio", "R_DEBT_SAVINGS"),
        ],
    ),
    (
        "Spending Categories (12 months)",
        &[
            text("Clothing", "T_CLOTHING_12"),
            text("Education", "T_EDUCATION_12"),
            text("Entertainment", "T_ENTERTAINMENT_12"),
            text("Groceries", "T_GROCERIES_12"),
            text("Health", "T_HEALTH_12"),
            text("Housing", "T_HOUSING_12"),
            text("Travel", "T_TRAVEL_12"),
            text("Utilities", "T_UTILITIES_12"),
            text("Total Expenditure", "T_EXPENDITURE_12"),
        ],
    ),
    (
        "Account Types",
        &[
            text("Gambling Account", "CAT_GAMBLING"),
            text("Debt Account", "CAT_DEBT"),
            text("Credit Card", "CAT_CREDIT_CARD"),
            text("Mortgage", "CAT_MORTGAGE"),
            text("Savings Account", "CAT_SAVINGS_ACCOUNT"),
            text("Dependents", "CAT_DEPENDENTS"),
        ],
    ),
];

impl Field {
    /// Render this field's value for `record`
    pub fn render(&self, record: &Record) -> String {
        match (self.kind, record.get(self.column)) {
            (_, None) => MISSING.to_string(),
            (FieldKind::Text, Some(value)) => value.to_string(),
            (FieldKind::DefaultFlag, Some(DEFAULT_MARKER)) => "Yes (Defaulted)".to_string(),
            (FieldKind::DefaultFlag, Some(_)) => "No (No Default)".to_string(),
        }
    }
}

/// Render a customer record as a labelled block
///
/// # Examples
///
/// ```
/// use scoremate::context::format_record;
/// use scoremate::dataset::parse_dataset;
///
/// let dataset = parse_dataset("CUST_ID,CREDIT_SCORE,DEFAULT\nC1,640,1\n", "inline");
/// let block = format_record(dataset.find("C1").unwrap());
/// assert!(block.contains("USER DATA FOR CUST_ID: C1"));
/// assert!(block.contains("- Credit Score: 640"));
/// assert!(block.contains("- Default Status: Yes (Defaulted)"));
/// assert!(block.contains("- Income: N/A"));
/// ```
pub fn format_record(record: &Record) -> String {
    let mut block = String::new();
    let _ = writeln!(block, "USER DATA FOR {}: {}", ID_COLUMN, record.id());

    for (title, fields) in RECORD_SECTIONS {
        let _ = writeln!(block);
        let _ = writeln!(block, "{}:", title);
        for field in fields.iter() {
            let _ = writeln!(block, "- {}: {}", field.label, field.render(record));
        }
    }

    block
}

/// Render the notice for an identifier with no record
///
/// The notice is addressed to the model: it must relay the miss to the user
/// rather than invent data.
pub fn format_not_found(id: &str) -> String {
    format!(
        "Note: Customer ID \"{}\" was not found in the dataset. Tell the user the ID was not \
         found and ask them to check it. Do not invent data for this customer.",
        id
    )
}

/// Render the dataset-wide context block
///
/// With `None` (the dataset could not be loaded) a fixed narrative is
/// returned instead of statistics.
///
/// # Examples
///
/// ```
/// use scoremate::context::format_dataset_summary;
/// use scoremate::dataset::parse_dataset;
///
/// let dataset = parse_dataset("CUST_ID,CREDIT_SCORE\nA,600\nB,700\nC,800\n", "inline");
/// let summary = format_dataset_summary(dataset.statistics());
/// assert!(summary.contains("- Average Credit Score: 700"));
/// assert!(summary.contains("- Total Records: 3 customers"));
///
/// let fallback = format_dataset_summary(None);
/// assert!(fallback.contains("CREDIT SCORE DATASET INFORMATION"));
/// ```
pub fn format_dataset_summary(stats: Option<&Statistics>) -> String {
    let Some(stats) = stats else {
        return FALLBACK_SUMMARY.to_string();
    };

    let mut block = String::new();
    block.push_str(COLUMN_CATALOG);
    let _ = writeln!(block);
    let _ = writeln!(block, "Dataset Statistics:");
    let _ = writeln!(block, "- Average Credit Score: {}", stats.average);
    let _ = writeln!(block, "- Minimum Credit Score: {}", stats.min);
    let _ = writeln!(block, "- Maximum Credit Score: {}", stats.max);
    let _ = writeln!(block, "- Default Rate: {:.2}%", stats.default_rate() * 100.0);
    let _ = writeln!(block, "- Total Records: {} customers", stats.total_records);
    let _ = writeln!(block);
    block.push_str(KEY_FEATURES);
    block
}

const COLUMN_CATALOG: &str = "\
CREDIT SCORE DATASET INFORMATION:

Dataset contains customer financial data with the following key columns:
- CUST_ID: Customer identifier
- INCOME: Customer income
- SAVINGS: Customer savings amount
- DEBT: Total debt amount
- CREDIT_SCORE: Credit score (ranges from ~400-700)
- DEFAULT: Whether customer defaulted (0 = No, 1 = Yes)
- T_*_12: Twelve-month spending per category (CLOTHING, EDUCATION, ENTERTAINMENT, GROCERIES, HEALTH, HOUSING, TRAVEL, UTILITIES, EXPENDITURE)
- R_*: Financial ratios (R_SAVINGS_INCOME, R_DEBT_INCOME, R_DEBT_SAVINGS)
- CAT_*: Account type flags (GAMBLING, DEBT, CREDIT_CARD, MORTGAGE, SAVINGS_ACCOUNT, DEPENDENTS)
";

const KEY_FEATURES: &str = "\
Key Features:
- Income levels vary significantly
- Debt-to-income ratios are tracked
- Multiple spending categories are monitored
- Credit scores correlate with payment behavior and financial ratios

IMPORTANT: You can answer questions about specific customer IDs (CUST_ID) from the dataset.
When customer data is included below, use it to describe their credit score, financial details,
spending patterns, and other relevant information.
";

const FALLBACK_SUMMARY: &str = "\
CREDIT SCORE DATASET INFORMATION:

The dataset contains customer financial data including:
- Customer IDs, Income, Savings, Debt amounts
- Credit Scores (typically ranging from 400-700)
- Default status (whether customer defaulted)
- Spending patterns across multiple categories
- Financial ratios (savings-to-income, debt-to-income, etc.)

Key insights:
- Credit scores are influenced by income, debt levels, and payment history
- Higher debt-to-income ratios correlate with lower credit scores
- Regular payments and lower debt utilization improve credit scores

Customer-level data is currently unavailable.
";

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::parse_dataset;
    use std::collections::HashMap;

    const FULL_HEADER: &str = "CUST_ID,INCOME,SAVINGS,DEBT,R_SAVINGS_INCOME,R_DEBT_INCOME,\
R_DEBT_SAVINGS,T_CLOTHING_12,T_EDUCATION_12,T_ENTERTAINMENT_12,T_GROCERIES_12,T_HEALTH_12,\
T_HOUSING_12,T_TRAVEL_12,T_UTILITIES_12,T_EXPENDITURE_12,CAT_GAMBLING,CAT_DEBT,\
CAT_CREDIT_CARD,CAT_MORTGAGE,CAT_SAVINGS_ACCOUNT,CAT_DEPENDENTS,CREDIT_SCORE,DEFAULT";

    const FULL_ROW: &str = "C03PVPPHOY,33269,0,532304,0.0000,16.0000,1.2000,1889,0,\
1005,3260,224,0,0,4020,15138,High,1,0,1,0,0,570,0";

    /// Parse `- Label: value` lines back into a map
    fn parse_block(block: &str) -> HashMap<String, String> {
        block
            .lines()
            .filter_map(|line| line.strip_prefix("- "))
            .filter_map(|line| line.split_once(": "))
            .map(|(label, value)| (label.to_string(), value.to_string()))
            .collect()
    }

    #[test]
    fn test_record_round_trip_through_labels() {
        let csv = format!("{}\n{}\n", FULL_HEADER, FULL_ROW);
        let dataset = parse_dataset(&csv, "full");
        let record = dataset.find("C03PVPPHOY").unwrap();
        let parsed = parse_block(&format_record(record));

        for (_, fields) in RECORD_SECTIONS {
            for field in fields.iter() {
                let shown = parsed.get(field.label).expect("label present");
                match field.kind {
                    FieldKind::Text => {
                        assert_eq!(Some(shown.as_str()), record.get(field.column))
                    }
                    FieldKind::DefaultFlag => assert_eq!(shown, "No (No Default)"),
                }
            }
        }
        assert_eq!(parsed["Credit Score"], "570");
        assert_eq!(parsed["Gambling Account"], "High");
    }

    #[test]
    fn test_missing_fields_render_na_and_keep_labels() {
        let dataset = parse_dataset("CUST_ID,INCOME\nC1,\n", "sparse");
        let block = format_record(dataset.find("C1").unwrap());
        let parsed = parse_block(&block);

        let label_count: usize = RECORD_SECTIONS.iter().map(|(_, f)| f.len()).sum();
        assert_eq!(parsed.len(), label_count);
        assert!(parsed.values().all(|v| v == MISSING));
        assert!(block.contains("Account Types:"));
    }

    #[test]
    fn test_default_flag_rendering() {
        let dataset = parse_dataset("CUST_ID,DEFAULT\nA,1\nB,0\nC,\n", "flags");
        let render = |id: &str| parse_block(&format_record(dataset.find(id).unwrap()));
        assert_eq!(render("A")["Default Status"], "Yes (Defaulted)");
        assert_eq!(render("B")["Default Status"], "No (No Default)");
        assert_eq!(render("C")["Default Status"], MISSING);
    }

    #[test]
    fn test_not_found_mentions_identifier() {
        let note = format_not_found("ZZZ9999999");
        assert!(note.contains("\"ZZZ9999999\""));
        assert!(note.contains("not found"));
    }

    #[test]
    fn test_summary_percentage_has_two_decimals() {
        let dataset = parse_dataset("CUST_ID,DEFAULT\nA,1\nB,0\nC,0\n", "rate");
        let summary = format_dataset_summary(dataset.statistics());
        assert!(summary.contains("- Default Rate: 33.33%"));
    }

    #[test]
    fn test_summary_for_empty_dataset() {
        let dataset = parse_dataset("CUST_ID,CREDIT_SCORE\n", "empty");
        let summary = format_dataset_summary(dataset.statistics());
        assert!(summary.contains("- Default Rate: 0.00%"));
        assert!(summary.contains("- Total Records: 0 customers"));
    }

    #[test]
    fn test_fallback_summary_has_no_statistics() {
        let summary = format_dataset_summary(None);
        assert!(!summary.contains("Average Credit Score"));
        assert!(summary.contains("unavailable"));
    }
}
