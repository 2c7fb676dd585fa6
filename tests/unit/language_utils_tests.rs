/*!
 * Tests for ISO language code utilities
 */

use linguacue::language_utils::{self, LanguageCodeType};

#[test]
fn test_validate_language_code_withValidCodes_shouldSucceed() {
    assert_eq!(language_utils::validate_language_code("es").unwrap(), LanguageCodeType::Part1);
    assert_eq!(language_utils::validate_language_code("SPA").unwrap(), LanguageCodeType::Part2T);
    assert_eq!(language_utils::validate_language_code("fre").unwrap(), LanguageCodeType::Part2B);
}

#[test]
fn test_validate_language_code_withInvalidCodes_shouldFail() {
    assert!(language_utils::validate_language_code("xx").is_err());
    assert!(language_utils::validate_language_code("").is_err());
    assert!(language_utils::validate_language_code("spanish").is_err());
}

#[test]
fn test_normalize_to_part2t_shouldConvertAllForms() {
    assert_eq!(language_utils::normalize_to_part2t("es").unwrap(), "spa");
    assert_eq!(language_utils::normalize_to_part2t("ger").unwrap(), "deu");
    assert_eq!(language_utils::normalize_to_part2t("fra").unwrap(), "fra");
}

#[test]
fn test_language_codes_match_shouldCompareAcrossForms() {
    assert!(language_utils::language_codes_match("es", "spa"));
    assert!(language_utils::language_codes_match("fre", "fr"));
    assert!(!language_utils::language_codes_match("es", "en"));
}

#[test]
fn test_primary_subtag_shouldHandleBothSeparators() {
    assert_eq!(language_utils::primary_subtag("es-419"), "es");
    assert_eq!(language_utils::primary_subtag("pt_BR"), "pt");
    assert_eq!(language_utils::primary_subtag("en"), "en");
}

#[test]
fn test_get_language_name_withUnknownCode_shouldFail() {
    assert_eq!(language_utils::get_language_name("es").unwrap(), "Spanish");
    assert!(language_utils::get_language_name("zz").is_err());
}
