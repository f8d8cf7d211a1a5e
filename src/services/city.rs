use std::collections::HashMap;
use std::sync::LazyLock;

/// Official county/city names served when the CWA location list is unavailable
pub const DEFAULT_LOCATION_NAMES: [&str; 22] = [
    "臺北市", "新北市", "桃園市", "臺中市", "臺南市", "高雄市", "基隆市", "新竹市", "嘉義市",
    "新竹縣", "苗栗縣", "彰化縣", "南投縣", "雲林縣", "嘉義縣", "屏東縣", "宜蘭縣", "花蓮縣",
    "臺東縣", "澎湖縣", "金門縣", "連江縣",
];

/// Colloquial, abbreviated and historical names mapped to official names
const CORRECTIONS: &[(&str, &str)] = &[
    ("台北市", "臺北市"), ("台北", "臺北市"), ("北市", "臺北市"), ("北", "臺北市"),
    ("新北", "新北市"), ("臺北縣", "新北市"),
    ("桃園", "桃園市"), ("桃園縣", "桃園市"), ("桃", "桃園市"), ("園", "桃園市"),
    ("台中", "臺中市"), ("台中市", "臺中市"), ("台中縣", "臺中市"), ("臺中縣", "臺中市"),
    ("中縣", "臺中市"), ("中市", "臺中市"), ("臺中", "臺中市"), ("中", "臺中市"),
    ("台南", "臺南市"), ("台南市", "臺南市"), ("臺南", "臺南市"), ("台南縣", "臺南市"),
    ("臺南縣", "臺南市"),
    ("高雄", "高雄市"), ("雄市", "高雄市"), ("雄", "高雄市"), ("高雄縣", "高雄市"),
    ("基隆", "基隆市"), ("基", "基隆市"), ("隆", "基隆市"), ("雞", "基隆市"), ("籠", "基隆市"),
    ("雞籠", "基隆市"), ("基隆縣", "基隆市"), ("基市", "基隆市"), ("隆市", "基隆市"),
    ("雞市", "基隆市"), ("籠市", "基隆市"), ("雞籠市", "基隆市"), ("雞籠縣", "基隆市"),
    ("雞縣", "基隆市"), ("籠縣", "基隆市"),
    ("新竹", "新竹市"), ("竹", "新竹市"), ("竹市", "新竹市"), ("竹縣", "新竹縣"),
    ("嘉義", "嘉義市"), ("嘉", "嘉義市"), ("義", "嘉義市"), ("嘉縣", "嘉義縣"), ("義縣", "嘉義縣"),
    ("苗栗", "苗栗縣"), ("苗", "苗栗縣"), ("栗", "苗栗縣"), ("栗縣", "苗栗縣"), ("苗縣", "苗栗縣"),
    ("苗栗市", "苗栗縣"),
    ("彰化", "彰化縣"), ("彰", "彰化縣"), ("化", "彰化縣"), ("彰縣", "彰化縣"), ("化縣", "彰化縣"),
    ("彰化市", "彰化縣"),
    ("南投", "南投縣"), ("投", "南投縣"), ("投縣", "南投縣"), ("南投市", "南投縣"),
    ("雲林", "雲林縣"), ("雲", "雲林縣"), ("林", "雲林縣"), ("雲縣", "雲林縣"), ("林縣", "雲林縣"),
    ("雲林市", "雲林縣"),
    ("屏東", "屏東縣"), ("屏", "屏東縣"), ("屏縣", "屏東縣"), ("屏東市", "屏東縣"),
    ("琉球嶼", "屏東縣"), ("小琉球", "屏東縣"), ("琉球", "屏東縣"),
    ("宜蘭", "宜蘭縣"), ("宜", "宜蘭縣"), ("蘭", "宜蘭縣"), ("宜縣", "宜蘭縣"), ("蘭縣", "宜蘭縣"),
    ("宜蘭市", "宜蘭縣"), ("龜山島", "宜蘭縣"),
    ("花蓮", "花蓮縣"), ("花", "花蓮縣"), ("蓮", "花蓮縣"), ("花縣", "花蓮縣"), ("蓮縣", "花蓮縣"),
    ("花蓮市", "花蓮縣"),
    ("台東", "臺東縣"), ("台東縣", "臺東縣"), ("台東市", "臺東縣"), ("綠島", "臺東縣"),
    ("綠鳥", "臺東縣"), ("蘭嶼", "臺東縣"),
    ("澎湖", "澎湖縣"), ("澎", "澎湖縣"), ("湖", "澎湖縣"), ("澎縣", "澎湖縣"), ("湖縣", "澎湖縣"),
    ("澎湖市", "澎湖縣"),
    ("金門", "金門縣"), ("金", "金門縣"), ("門", "金門縣"), ("金縣", "金門縣"), ("門縣", "金門縣"),
    ("金門市", "金門縣"),
    ("連江", "連江縣"), ("連江市", "連江縣"), ("馬祖", "連江縣"), ("馬縣", "連江縣"),
    ("祖縣", "連江縣"), ("連", "連江縣"), ("江", "連江縣"), ("連縣", "連江縣"),
];

static MANUAL_CORRECTIONS: LazyLock<HashMap<&'static str, &'static str>> =
    LazyLock::new(|| CORRECTIONS.iter().copied().collect());

/// Looks up the official name for a colloquial or abbreviated city name
pub fn correct(name: &str) -> Option<&'static str> {
    MANUAL_CORRECTIONS.get(name).copied()
}

/// Resolves user input to an official CWA location name
///
/// The correction table is consulted first, then the official names
/// themselves. Returns `None` when the input is not a place, in which case
/// callers treat it as a free-text weather keyword.
pub fn resolve_city<S: AsRef<str>>(input: &str, location_names: &[S]) -> Option<String> {
    let input = input.trim();
    if input.is_empty() {
        return None;
    }

    if let Some(canonical) = correct(input) {
        return Some(canonical.to_string());
    }

    location_names
        .iter()
        .find(|name| name.as_ref() == input)
        .map(|name| name.as_ref().to_string())
}

/// Default location names as owned strings
pub fn default_location_names() -> Vec<String> {
    DEFAULT_LOCATION_NAMES.iter().map(|s| s.to_string()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_corrections_resolve_to_official_names() {
        let names = default_location_names();
        for (alias, canonical) in CORRECTIONS {
            assert_eq!(
                resolve_city(alias, &names).as_deref(),
                Some(*canonical),
                "alias {alias}"
            );
        }
    }

    #[test]
    fn test_correction_targets_are_official() {
        for (_, canonical) in CORRECTIONS {
            assert!(
                DEFAULT_LOCATION_NAMES.contains(canonical),
                "{canonical} is not an official location"
            );
        }
    }

    #[test]
    fn test_correction_wins_without_location_list() {
        let empty: Vec<String> = Vec::new();
        assert_eq!(resolve_city("台北", &empty).as_deref(), Some("臺北市"));
        assert_eq!(resolve_city("馬祖", &empty).as_deref(), Some("連江縣"));
    }

    #[test]
    fn test_official_name_passes_through() {
        let names = default_location_names();
        assert_eq!(resolve_city("花蓮縣", &names).as_deref(), Some("花蓮縣"));
        assert_eq!(resolve_city("  新竹縣 ", &names).as_deref(), Some("新竹縣"));
    }

    #[test]
    fn test_keyword_does_not_resolve() {
        let names = default_location_names();
        assert_eq!(resolve_city("晴", &names), None);
        assert_eq!(resolve_city("午後雷陣雨", &names), None);
        assert_eq!(resolve_city("", &names), None);
        assert_eq!(resolve_city("   ", &names), None);
    }

    #[test]
    fn test_correct_lookup() {
        assert_eq!(correct("小琉球"), Some("屏東縣"));
        assert_eq!(correct("竹縣"), Some("新竹縣"));
        assert_eq!(correct("臺北市"), None);
    }
}
