/// Keyword index on a payload field, used for exact-match filters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PayloadIndex {
    pub field_name: String,
}

impl PayloadIndex {
    pub fn keyword(field_name: &str) -> Self {
        Self {
            field_name: field_name.to_string(),
        }
    }
}
