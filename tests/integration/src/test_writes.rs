//! End-to-end writes through fields, including auto-vivification.

#[cfg(test)]
mod tests {
    use fieldstack_core::{Context, PathError, Value, field};

    use crate::{init_tracing, sample_customer};

    #[test]
    fn test_should_create_intermediates_when_writing_into_empty_document() {
        init_tracing();
        let zip = field::<i64, _>(["user", "address", "zip"]).unwrap();
        let ctx = Context::new();
        let mut doc = Value::from(serde_json::json!({}));

        zip.set(&mut doc, &ctx, Some(42)).unwrap();
        assert_eq!(zip.get(&doc, &ctx), Some(42));

        let json: serde_json::Value = doc.into();
        assert_eq!(json, serde_json::json!({"user": {"address": {"zip": 42}}}));
    }

    #[test]
    fn test_should_update_existing_document_in_place() {
        init_tracing();
        let city = field::<String, _>(["user", "address", "city"]).unwrap();
        let ctx = Context::new();
        let mut doc = sample_customer();

        assert_eq!(city.get(&doc, &ctx), Some("paris".to_owned()));
        city.set(&mut doc, &ctx, Some("lyon".to_owned())).unwrap();
        assert_eq!(city.get(&doc, &ctx), Some("lyon".to_owned()));
        // Sibling data is untouched.
        assert_eq!(
            field::<i64, _>(["user", "address", "zip"]).unwrap().get(&doc, &ctx),
            Some(75001)
        );
    }

    #[test]
    fn test_should_surface_shape_mismatch_without_partial_damage_above_it() {
        init_tracing();
        let inner = field::<String, _>(["active", "reason"]).unwrap();
        let mut doc = sample_customer();

        // `active` exists as a bool; descending into it for a write must fail.
        let err = inner
            .set(&mut doc, &Context::new(), Some("x".to_owned()))
            .unwrap_err();
        assert!(matches!(err, PathError::ShapeMismatch { .. }));
        assert_eq!(
            field::<bool, _>(["active"]).unwrap().get(&doc, &Context::new()),
            Some(true)
        );
    }

    #[test]
    fn test_should_clear_value_by_writing_absence() {
        init_tracing();
        let name = field::<String, _>(["user", "name"]).unwrap();
        let ctx = Context::new();
        let mut doc = sample_customer();

        name.set(&mut doc, &ctx, None).unwrap();
        assert_eq!(name.get(&doc, &ctx), None);
        assert_eq!(name.is_null().get(&doc, &ctx), Some(true));
    }
}
