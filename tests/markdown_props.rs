use odk_transformer::markdown::to_html;
use proptest::prelude::*;

proptest! {
    #[test]
    fn raw_markup_is_never_emitted(text in "[a-z <>/*_#\\n]{0,40}") {
        let html = to_html(&format!("<script>{text}</script><img src=x onerror=alert(1)>"));
        prop_assert!(!html.contains("<script"));
        prop_assert!(!html.contains("<img"));
    }

    #[test]
    fn rendering_is_deterministic(text in "\\PC{0,60}") {
        prop_assert_eq!(to_html(&text), to_html(&text));
    }

    #[test]
    fn plain_words_pass_through(text in "[A-Za-z]{1,12}( [A-Za-z]{1,12}){0,5}") {
        prop_assert_eq!(to_html(&text), text);
    }
}
