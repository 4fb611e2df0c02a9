//! System prompt for the credit-score assistant
//!
//! The system message sent with every request is assembled from four parts:
//! a fixed role description, the dataset summary, an optional customer block
//! (a formatted record or a not-found notice), and fixed guidance about the
//! site's capabilities and how to answer.

pub mod assistant_prompt;

/// Builds the system prompt for one request
///
/// # Arguments
///
/// * `dataset_summary` - Output of [`crate::context::format_dataset_summary`]
/// * `customer_block` - Formatted record or not-found notice, when the user
///   mentioned an identifier
///
/// # Examples
///
/// ```
/// use scoremate::prompts::build_system_prompt;
///
/// let prompt = build_system_prompt("DATASET SUMMARY", Some("USER DATA FOR CUST_ID: C1"));
/// assert!(prompt.starts_with("You are a helpful AI assistant"));
/// assert!(prompt.contains("DATASET SUMMARY"));
/// assert!(prompt.contains("USER DATA FOR CUST_ID: C1"));
/// ```
pub fn build_system_prompt(dataset_summary: &str, customer_block: Option<&str>) -> String {
    let mut prompt = String::with_capacity(
        assistant_prompt::ROLE.len()
            + dataset_summary.len()
            + customer_block.map_or(0, str::len)
            + assistant_prompt::GUIDANCE.len()
            + 8,
    );
    prompt.push_str(assistant_prompt::ROLE);
    prompt.push_str("\n\n");
    prompt.push_str(dataset_summary.trim_end());
    prompt.push('\n');
    if let Some(block) = customer_block {
        prompt.push('\n');
        prompt.push_str(block.trim_end());
        prompt.push('\n');
    }
    prompt.push('\n');
    prompt.push_str(assistant_prompt::GUIDANCE);
    prompt
}
