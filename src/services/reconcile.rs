//! Mapping between the stored `template_sent_by` column and the
//! `sale_methods` multi-select shown on the settings form.
//!
//! The mapping is total and deterministic in both directions but not an
//! exact inverse: only the three canonical intents survive a round trip.
//! `{package, custom}` collapses to `both`, which expands back to `{both}`.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::db::TemplateSentBy;

/// How workout plans reach clients: sold by trainers as packages, generated
/// by the system as custom plans, or both.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SaleMethod {
    Package,
    Custom,
    Both,
}

pub type SaleMethods = BTreeSet<SaleMethod>;

/// Expand the stored column into its canonical selection. `None` and values
/// outside the enum domain select `both`.
pub fn to_sale_methods(template_sent_by: Option<&str>) -> SaleMethods {
    let method = match template_sent_by.and_then(TemplateSentBy::parse) {
        Some(TemplateSentBy::Trainer) => SaleMethod::Package,
        Some(TemplateSentBy::System) => SaleMethod::Custom,
        Some(TemplateSentBy::Both) | None => SaleMethod::Both,
    };
    BTreeSet::from([method])
}

/// Collapse a selection into the stored column. Anything but a single
/// `package` or a single `custom` is `both`.
pub fn to_template_sent_by(sale_methods: &SaleMethods) -> TemplateSentBy {
    if sale_methods.len() != 1 {
        return TemplateSentBy::Both;
    }
    match sale_methods.iter().next() {
        Some(SaleMethod::Package) => TemplateSentBy::Trainer,
        Some(SaleMethod::Custom) => TemplateSentBy::System,
        _ => TemplateSentBy::Both,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(methods: &[SaleMethod]) -> SaleMethods {
        methods.iter().copied().collect()
    }

    #[test]
    fn expands_every_stored_value_to_one_canonical_set() {
        assert_eq!(to_sale_methods(Some("trainer")), set(&[SaleMethod::Package]));
        assert_eq!(to_sale_methods(Some("system")), set(&[SaleMethod::Custom]));
        assert_eq!(to_sale_methods(Some("both")), set(&[SaleMethod::Both]));
        assert_eq!(to_sale_methods(None), set(&[SaleMethod::Both]));
        assert_eq!(to_sale_methods(Some("garbage")), set(&[SaleMethod::Both]));
        assert_eq!(to_sale_methods(Some("")), set(&[SaleMethod::Both]));
    }

    #[test]
    fn collapses_only_singletons_to_a_specific_sender() {
        assert_eq!(to_template_sent_by(&set(&[SaleMethod::Package])), TemplateSentBy::Trainer);
        assert_eq!(to_template_sent_by(&set(&[SaleMethod::Custom])), TemplateSentBy::System);
        assert_eq!(to_template_sent_by(&set(&[SaleMethod::Both])), TemplateSentBy::Both);
        assert_eq!(to_template_sent_by(&set(&[])), TemplateSentBy::Both);
        assert_eq!(
            to_template_sent_by(&set(&[SaleMethod::Package, SaleMethod::Custom])),
            TemplateSentBy::Both
        );
        assert_eq!(
            to_template_sent_by(&set(&[SaleMethod::Package, SaleMethod::Both])),
            TemplateSentBy::Both
        );
        assert_eq!(
            to_template_sent_by(&set(&[
                SaleMethod::Package,
                SaleMethod::Custom,
                SaleMethod::Both
            ])),
            TemplateSentBy::Both
        );
    }

    #[test]
    fn canonical_values_survive_the_round_trip() {
        for value in [TemplateSentBy::Trainer, TemplateSentBy::System, TemplateSentBy::Both] {
            assert_eq!(to_template_sent_by(&to_sale_methods(Some(value.as_str()))), value);
        }
    }

    #[test]
    fn mixed_selection_does_not_survive_the_round_trip() {
        let mixed = set(&[SaleMethod::Package, SaleMethod::Custom]);
        let stored = to_template_sent_by(&mixed);
        assert_eq!(stored, TemplateSentBy::Both);
        assert_eq!(to_sale_methods(Some(stored.as_str())), set(&[SaleMethod::Both]));
    }

    #[test]
    fn sale_methods_use_lowercase_wire_names() {
        let json = serde_json::to_string(&set(&[SaleMethod::Package, SaleMethod::Custom])).unwrap();
        assert_eq!(json, r#"["package","custom"]"#);
        assert!(serde_json::from_str::<SaleMethods>(r#"["bogus"]"#).is_err());
    }
}
