//! End-to-end predicate construction and evaluation.

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use fieldstack_core::{
        Context, Function, Interceptor, Metadata, Operand, PathSegment, TracingInterceptor, Value,
        field,
    };

    use crate::{init_tracing, sample_customer};

    #[derive(Default)]
    struct CountingHook {
        gets: AtomicUsize,
    }

    impl Interceptor for CountingHook {
        fn on_get(&self, _metadata: &Metadata) {
            self.gets.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[test]
    fn test_should_evaluate_composed_predicate_against_document() {
        init_tracing();
        let doc = sample_customer();
        let ctx = Context::new();

        let vip_parisian = field::<String, _>(["user", "address", "city"])
            .unwrap()
            .eq("paris".to_owned())
            .and(
                field::<String, _>(vec![
                    PathSegment::from("user"),
                    PathSegment::from("tags"),
                    PathSegment::from(0usize),
                ])
                .unwrap()
                .eq("vip".to_owned()),
            );

        assert_eq!(vip_parisian.get(&doc, &ctx), Some(true));
    }

    #[test]
    fn test_should_reuse_one_tree_across_documents_and_contexts() {
        init_tracing();
        let age_is_thirty = field::<i64, _>(["user", "age"]).unwrap().eq(30);
        let is_admin = field::<bool, _>(["user", "admin"]).unwrap().is_truthy();
        let allowed = age_is_thirty.or(&is_admin);

        let alice = sample_customer();
        let nobody = Value::from(serde_json::json!({}));

        for ctx in [Context::new(), Context::with_short_circuit(true)] {
            assert_eq!(allowed.get(&alice, &ctx), Some(true));
            assert_eq!(allowed.get(&nobody, &ctx), Some(false));
        }
    }

    #[test]
    fn test_should_skip_expensive_right_side_in_short_circuit_mode() {
        init_tracing();
        let hook = Arc::new(CountingHook::default());
        let expensive = field::<bool, _>(["active"])
            .unwrap()
            .is_truthy()
            .with_interceptor(hook.clone());
        let gate = field::<i64, _>(["user", "age"]).unwrap().eq(99).and(expensive);

        let doc = sample_customer();
        assert_eq!(gate.get(&doc, &Context::with_short_circuit(true)), Some(false));
        assert_eq!(hook.gets.load(Ordering::SeqCst), 0);

        // Eager mode consults the right side regardless.
        assert_eq!(gate.get(&doc, &Context::new()), Some(false));
        assert_eq!(hook.gets.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_should_render_metadata_mirroring_composition() {
        let expr = field::<String, _>(["user", "name"])
            .unwrap()
            .match_any(["alice".to_owned(), "bob".to_owned()])
            .and(field::<i64, _>(["user", "age"]).unwrap().is_not_null());

        assert_eq!(
            expr.metadata().to_string(),
            r#"((user.name match any ["alice", "bob"]) and user.age is not null)"#
        );
    }

    #[test]
    fn test_should_combine_literals_nodes_and_transforms() {
        init_tracing();
        let doc = sample_customer();
        let ctx = Context::new();

        let name_length = field::<String, _>(["user", "name"])
            .unwrap()
            .map_to::<i64, _>("string_length", |v| {
                v.map(|s| i64::try_from(s.len()).unwrap_or(i64::MAX))
            });
        let expected = Function::lift(5i64);

        assert_eq!(name_length.eq(&expected).get(&doc, &ctx), Some(true));
        assert_eq!(
            name_length.eq(Operand::Value(4)).get(&doc, &ctx),
            Some(false)
        );
    }

    #[test]
    fn test_should_log_through_tracing_interceptor() {
        init_tracing();
        let node = field::<i64, _>(["user", "age"])
            .unwrap()
            .with_interceptor(Arc::new(TracingInterceptor));
        assert_eq!(node.get(&sample_customer(), &Context::new()), Some(30));
    }
}
