// THEORY:
// English plurals for detector category names. The detector vocabulary is small
// and known, so irregular, invariant and mass-noun plurals are written out by
// hand in a dictionary ("mouse" -> "mice", "sheep" -> "sheep",
// "scissors" -> "pairs of scissors"). Anything missing from the dictionary falls
// through to a short list of regular suffix rules.
//
// The dictionary is built once on first use and only ever read afterwards.

use std::collections::{HashMap, HashSet};
use std::sync::OnceLock;

static PLURALS: OnceLock<HashMap<&'static str, &'static str>> = OnceLock::new();
static KNOWN_PLURALS: OnceLock<HashSet<&'static str>> = OnceLock::new();

const PLURAL_TABLE: &[(&str, &str)] = &[
    ("apple", "apples"),
    ("backpack", "backpacks"),
    ("ball", "balls"),
    ("banana", "bananas"),
    ("baseball bat", "baseball bats"),
    ("baseball glove", "baseball gloves"),
    ("bear", "bears"),
    ("bed", "beds"),
    ("bench", "benches"),
    ("bicycle", "bicycles"),
    ("bird", "birds"),
    ("boat", "boats"),
    ("book", "books"),
    ("bottle", "bottles"),
    ("bowl", "bowls"),
    ("broccoli", "bunches of broccoli"),
    ("bus", "busses"),
    ("cake", "cakes"),
    ("car", "cars"),
    ("carrot", "carrots"),
    ("cat", "cats"),
    ("chair", "chairs"),
    ("clock", "clocks"),
    ("couch", "couches"),
    ("cow", "cows"),
    ("cup", "cups"),
    ("dining table", "dining tables"),
    ("dog", "dogs"),
    ("donut", "donuts"),
    ("elephant", "elephants"),
    ("fire hydrant", "fire hydrants"),
    ("fork", "forks"),
    ("frisbee", "frisbees"),
    ("giraffe", "giraffes"),
    ("hair drier", "hair driers"),
    ("handbag", "handbags"),
    ("horse", "horses"),
    ("hot dog", "hot dogs"),
    ("keyboard", "keyboards"),
    ("kite", "kites"),
    ("knife", "knives"),
    ("laptop", "laptops"),
    ("microwave", "microwave ovens"),
    ("mobile phone", "mobile phones"),
    ("monitor", "monitors"),
    ("motorcycle", "motorcycles"),
    ("mouse", "mice"),
    ("orange", "oranges"),
    ("oven", "ovens"),
    ("parking meter", "parking meters"),
    ("person", "people"),
    ("pizza", "pizzas"),
    ("plane", "planes"),
    ("potted plant", "potted plants"),
    ("refrigerator", "refrigerators"),
    ("remote", "remotes"),
    ("sandwich", "sandwiches"),
    ("scissors", "pairs of scissors"),
    ("sheep", "sheep"),
    ("sink", "sinks"),
    ("skateboard", "skateboards"),
    ("skis", "pairs of skis"),
    ("snowboard", "snowboards"),
    ("spoon", "spoons"),
    ("stop sign", "stop signs"),
    ("suitcase", "suitcases"),
    ("surfboard", "surfboards"),
    ("teddy bear", "teddy bears"),
    ("tennis racket", "tennis rackets"),
    ("tie", "ties"),
    ("toaster", "toasters"),
    ("toilet", "toilets"),
    ("toothbrush", "toothbrushes"),
    ("traffic light", "traffic lights"),
    ("train", "trains"),
    ("truck", "trucks"),
    ("umbrella", "umbrellas"),
    ("vase", "vases"),
    ("wine glass", "wine glasses"),
    ("zebra", "zebras"),
];

fn plurals() -> &'static HashMap<&'static str, &'static str> {
    PLURALS.get_or_init(|| PLURAL_TABLE.iter().copied().collect())
}

fn known_plurals() -> &'static HashSet<&'static str> {
    KNOWN_PLURALS.get_or_init(|| PLURAL_TABLE.iter().map(|(_, plural)| *plural).collect())
}

/// Apply the regular English suffix rules, in priority order.
fn regular_plural(word: &str) -> String {
    if word.ends_with("ey") {
        format!("{word}s")
    } else if let Some(stem) = word.strip_suffix('y') {
        format!("{stem}ies")
    } else if word.ends_with('s') || word.ends_with('x') || word.ends_with("sh") || word.ends_with("ch") {
        format!("{word}es")
    } else if word.len() > 3 && word.ends_with("an") {
        format!("{}en", &word[..word.len() - 2])
    } else {
        format!("{word}s")
    }
}

/// Plural form of a category name, lower-cased.
///
/// Dictionary entries win over the regular rules, and a word that already is one
/// of the dictionary's plural forms is returned unchanged.
pub fn pluralize(category: &str) -> String {
    let word = category.to_lowercase();

    if let Some(plural) = plurals().get(word.as_str()) {
        return (*plural).to_string();
    }
    if known_plurals().contains(word.as_str()) {
        return word;
    }

    regular_plural(&word)
}
