// THEORY:
// The `composer` is the grammar layer. It turns counted `FeatureGroup`s into
// noun phrases and joins them into the one sentence that is finally spoken.
//
// Per group:
// - one object:   "{a|an} [{color} ]{category}[ to your {region}]"
// - many objects: "{count} [{color} ]{plural}[ to your {region}]"
// The article looks only at the first letter of the first word that follows it.
//
// Phrases are joined English-style: "a, b and c". One phrase stands alone; no
// phrases make an empty sentence, which is how an empty scene is narrated.

use crate::core_modules::aggregator::FeatureGroup;
use crate::core_modules::plurals::pluralize;
use crate::error::DescribeError;

const VOWELS: [char; 5] = ['a', 'e', 'i', 'o', 'u'];

fn article_for(word: &str) -> &'static str {
    match word.chars().next() {
        Some(first) if VOWELS.contains(&first.to_ascii_lowercase()) => "an",
        _ => "a",
    }
}

/// Build the noun phrase for one group.
pub fn phrase(group: &FeatureGroup, include_color: bool, include_position: bool) -> Result<String, DescribeError> {
    let key = &group.key;
    if group.count == 0 {
        return Err(DescribeError::InvalidCount {
            category: key.category.clone(),
            count: group.count,
        });
    }

    let color = key.color.filter(|_| include_color);
    let region = key.region.filter(|_| include_position);

    let noun = if group.count == 1 {
        key.category.clone()
    } else {
        pluralize(&key.category)
    };

    let described = match color {
        Some(color) => format!("{color} {noun}"),
        None => noun,
    };

    let mut text = if group.count == 1 {
        format!("{} {described}", article_for(&described))
    } else {
        format!("{} {described}", group.count)
    };

    if let Some(region) = region {
        text.push_str(" to your ");
        text.push_str(region.as_str());
    }

    Ok(text)
}

/// Join phrases as "a, b and c".
pub fn join_phrases(phrases: &[String]) -> String {
    match phrases {
        [] => String::new(),
        [only] => only.clone(),
        [head @ .., last] => format!("{} and {last}", head.join(", ")),
    }
}

/// Compose the full description of a frame from its groups.
pub fn compose(groups: &[FeatureGroup], include_color: bool, include_position: bool) -> Result<String, DescribeError> {
    let phrases = groups
        .iter()
        .map(|group| phrase(group, include_color, include_position))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(join_phrases(&phrases))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core_modules::aggregator::GroupKey;
    use crate::core_modules::color::Color;
    use crate::core_modules::position::Region;

    fn group(category: &str, color: Option<Color>, region: Option<Region>, count: usize) -> FeatureGroup {
        FeatureGroup::new(GroupKey::new(category, color, region), count)
    }

    #[test]
    fn singular_and_plural() {
        assert_eq!(compose(&[group("cup", None, None, 1)], false, false).unwrap(), "a cup");
        assert_eq!(compose(&[group("cup", None, None, 2)], false, false).unwrap(), "2 cups");
    }

    #[test]
    fn article_follows_first_word() {
        assert_eq!(compose(&[group("apple", None, None, 1)], false, false).unwrap(), "an apple");
        assert_eq!(
            compose(&[group("apple", Some(Color::Red), None, 1)], true, false).unwrap(),
            "a red apple"
        );
        assert_eq!(
            compose(&[group("cup", Some(Color::Orange), None, 1)], true, false).unwrap(),
            "an orange cup"
        );
        assert_eq!(compose(&[group("Umbrella", None, None, 1)], false, false).unwrap(), "an Umbrella");
    }

    #[test]
    fn color_and_region_are_spoken() {
        let groups = [
            group("cup", Some(Color::Red), Some(Region::Left), 2),
            group("ski", Some(Color::Black), Some(Region::Left), 1),
        ];
        assert_eq!(
            compose(&groups, true, true).unwrap(),
            "2 red cups to your left and a black ski to your left"
        );
    }

    #[test]
    fn flags_suppress_fields_present_in_key() {
        let groups = [group("person", Some(Color::Blue), Some(Region::Center), 3)];
        assert_eq!(compose(&groups, false, false).unwrap(), "3 people");
        assert_eq!(compose(&groups, false, true).unwrap(), "3 people to your center");
    }

    #[test]
    fn three_or_more_phrases_use_commas() {
        let groups = [
            group("cup", None, None, 1),
            group("dog", None, None, 2),
            group("mouse", None, None, 3),
            group("apple", None, None, 1),
        ];
        assert_eq!(
            compose(&groups, false, false).unwrap(),
            "a cup, 2 dogs, 3 mice and an apple"
        );
    }

    #[test]
    fn empty_and_single() {
        assert_eq!(join_phrases(&[]), "");
        assert_eq!(join_phrases(&["a cup".to_string()]), "a cup");
        assert_eq!(compose(&[], true, true).unwrap(), "");
    }

    #[test]
    fn zero_count_is_rejected() {
        let err = compose(&[group("cup", None, None, 0)], false, false).unwrap_err();
        match err {
            DescribeError::InvalidCount { category, count } => {
                assert_eq!(category, "cup");
                assert_eq!(count, 0);
            }
            other => panic!("Expected InvalidCount, got {other:?}"),
        }
    }
}
