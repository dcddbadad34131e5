//! Output column layout for hint tables.

pub const WORD_COLUMN: &str = "WORD";
pub const DEFINITION_COLUMN: &str = "DEFINITION";
pub const HINT_COLUMN: &str = "HINT";

/// Column order for an output table: `HINT` is added if missing and sits
/// right before `DEFINITION` when both `WORD` and `DEFINITION` exist,
/// otherwise last.
pub fn hint_column_order<S: AsRef<str>>(columns: &[S]) -> Vec<String> {
    let mut order: Vec<String> = columns
        .iter()
        .map(|c| c.as_ref().to_string())
        .filter(|c| c != HINT_COLUMN)
        .collect();

    let has_word = order.iter().any(|c| c == WORD_COLUMN);
    match order.iter().position(|c| c == DEFINITION_COLUMN) {
        Some(definition) if has_word => order.insert(definition, HINT_COLUMN.to_string()),
        _ => order.push(HINT_COLUMN.to_string()),
    }
    order
}
