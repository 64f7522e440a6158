//! Property tests for the filter pipeline and redactor

use hookguard_core::PatternCache;
use hookguard_filters::scanner::scan_all;
use hookguard_filters::secrets::secret_catalog;
use hookguard_filters::{redact_with_kind, FilterPipeline, Match, PatternKind};
use proptest::prelude::*;

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn clean_text_is_unchanged(text in "[0-9 ,.;:()]{0,200}") {
        let pipeline = FilterPipeline::builtin();
        let result = pipeline.run(&text);

        prop_assert_eq!(&result.filtered_text, &text);
        prop_assert_eq!(result.secret_count, 0);
        prop_assert_eq!(result.profanity_count, 0);
    }

    #[test]
    fn github_token_never_survives(
        prefix in "[0-9 ]{0,20}",
        token in "[A-Za-z0-9]{36,60}",
        suffix in "[0-9 ]{0,20}",
    ) {
        let secret = format!("ghp_{}", token);
        let text = format!("{} {} {}", prefix, secret, suffix);
        let result = FilterPipeline::builtin().run(&text);

        prop_assert!(!result.filtered_text.contains(&secret));
        prop_assert_eq!(result.filtered_text.matches("[SECRET:github_pat]").count(), 1);
    }

    #[test]
    fn redaction_order_is_stable(
        a in "[a-z]{0,10}",
        x in "[a-z]{1,10}",
        b in "[a-z]{0,10}",
        y in "[a-z]{1,10}",
        c in "[a-z]{0,10}",
    ) {
        let text = format!("{}{}{}{}{}", a, x, b, y, c);
        let m1_start = a.len();
        let m2_start = a.len() + x.len() + b.len();
        let m1 = Match::new("first", x.clone(), m1_start, m1_start + x.len());
        let m2 = Match::new("second", y.clone(), m2_start, m2_start + y.len());

        let both = redact_with_kind(&text, &[m1.clone(), m2.clone()], PatternKind::Secret);
        let reversed = redact_with_kind(&text, &[m2.clone(), m1.clone()], PatternKind::Secret);
        let later_first = redact_with_kind(&text, &[m2], PatternKind::Secret);
        let then_earlier = redact_with_kind(&later_first.text, &[m1], PatternKind::Secret);

        prop_assert_eq!(&both.text, &reversed.text);
        prop_assert_eq!(&both.text, &then_earlier.text);
        prop_assert_eq!(both.types, vec!["first".to_string(), "second".to_string()]);
    }

    #[test]
    fn overlapping_signatures_leak_nothing(
        host in "[a-z]{3,10}",
        password in "[A-Za-z0-9]{8,20}",
        scheme in prop::sample::select(vec!["postgres://app@", "mysql://app@", "redis://", "Basic "]),
    ) {
        let text = format!("conn {}{}?pwd=\"{}\" end", scheme, host, password);
        let raw = scan_all(&secret_catalog(&PatternCache::default(), &[]), &text);
        prop_assert!(raw.len() >= 2);

        let result = FilterPipeline::builtin().run(&text);
        for m in &raw {
            prop_assert!(
                !result.filtered_text.contains(&m.text),
                "{} survived in {}",
                m.text,
                result.filtered_text
            );
        }
        prop_assert!(!result.filtered_text.contains(&password));
    }
}
