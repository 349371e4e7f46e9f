use std::collections::BTreeMap;

use crate::model::Metafield;

/// First metafield matching `namespace` and `key`, in upstream order.
pub fn find_metafield<'a>(items: &'a [Metafield], namespace: &str, key: &str) -> Option<&'a Metafield> {
    items
        .iter()
        .find(|mf| mf.namespace == namespace && mf.key == key)
}

/// Fold every metafield in `namespace` into a key → value map.
///
/// With `key` set only that key survives. Duplicate keys keep their first occurrence.
pub fn namespace_fields(
    items: &[Metafield],
    namespace: &str,
    key: Option<&str>,
) -> BTreeMap<String, Option<String>> {
    let mut fields = BTreeMap::new();
    for mf in items {
        if mf.namespace != namespace || key.is_some_and(|k| mf.key != k) {
            continue;
        }
        fields
            .entry(mf.key.clone())
            .or_insert_with(|| mf.value.clone());
    }
    fields
}
