use serde::{Deserialize, Serialize};

use crate::target::FilterTarget;

pub const BASIC_FILTER_SCHEMA: &str = "http://powerbi.com/product/schema#basic";

/// How the host combines this widget's filter with others.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterAction {
    /// Compose with filters held by other widgets on other columns.
    Merge,
    /// Withdraw this widget's own filter.
    Remove,
}

/// Declarative "column ∈ {values}" request.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterDescriptor {
    #[serde(rename = "$schema")]
    pub schema: String,
    pub target: FilterTarget,
    #[serde(rename = "filterType")]
    pub filter_type: u8,
    pub operator: String,
    pub values: Vec<String>,
}

impl FilterDescriptor {
    /// Set-membership filter over `values`.
    pub fn basic_in(target: FilterTarget, values: Vec<String>) -> Self {
        Self {
            schema: BASIC_FILTER_SCHEMA.to_string(),
            target,
            filter_type: 1,
            operator: "In".to_string(),
            values,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_as_basic_filter() {
        let f = FilterDescriptor::basic_in(FilterTarget::new("Geo", "State"), vec!["SP".into()]);
        let v = serde_json::to_value(&f).unwrap();
        assert_eq!(v["$schema"], BASIC_FILTER_SCHEMA);
        assert_eq!(v["target"]["table"], "Geo");
        assert_eq!(v["target"]["column"], "State");
        assert_eq!(v["filterType"], 1);
        assert_eq!(v["operator"], "In");
        assert_eq!(v["values"][0], "SP");
    }
}
