//! Product catalog used by the sample flow.

use super::payload::Product;

/// Products offered for a category (`cordless`, `rotary`, `hammer`).
/// Unknown categories have no products.
pub fn products_by_category(category: &str) -> Vec<Product> {
    match category {
        "cordless" => vec![
            Product::new("prod_makita_ddf485", "Makita DDF485").with_description("18V, 2 סוללות"),
            Product::new("prod_dewalt_dcd791", "DeWalt DCD791").with_description("18V XR"),
            Product::new("prod_bosch_gsr18", "Bosch GSR 18V-55"),
        ],
        "rotary" => vec![
            Product::new("prod_makita_hp1631", "Makita HP1631").with_description("710W"),
            Product::new("prod_bosch_gsb13", "Bosch GSB 13 RE").with_description("600W"),
            Product::new("prod_dewalt_dwd024", "DeWalt DWD024"),
            Product::new("prod_metabo_sbe650", "Metabo SBE 650"),
            Product::new("prod_hikoki_dv16v", "HiKOKI DV16V"),
        ],
        "hammer" => vec![
            Product::new("prod_makita_hr2470", "Makita HR2470").with_description("SDS-Plus 780W"),
            Product::new("prod_bosch_gbh226", "Bosch GBH 2-26"),
            Product::new("prod_dewalt_d25133", "DeWalt D25133K"),
            Product::new("prod_milwaukee_plh28", "Milwaukee PLH 28"),
        ],
        _ => Vec::new(),
    }
}

/// Look a product up by id across all categories.
pub fn product_by_id(product_id: &str) -> Option<Product> {
    ["cordless", "rotary", "hammer"]
        .iter()
        .flat_map(|c| products_by_category(c))
        .find(|p| p.id == product_id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup() {
        assert_eq!(products_by_category("cordless").len(), 3);
        assert!(products_by_category("welding").is_empty());
        assert_eq!(
            product_by_id("prod_bosch_gbh226").map(|p| p.name),
            Some("Bosch GBH 2-26".to_string())
        );
        assert!(product_by_id("prod_missing").is_none());
    }

    #[test]
    fn test_ids_are_unique() {
        let mut ids: Vec<String> = ["cordless", "rotary", "hammer"]
            .iter()
            .flat_map(|c| products_by_category(c))
            .map(|p| p.id)
            .collect();
        let total = ids.len();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), total);
    }
}
