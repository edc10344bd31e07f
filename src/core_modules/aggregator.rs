// THEORY:
// The `aggregator` turns a frame's worth of `ObjectFeature`s into countable groups.
// The caller picks how fine the grouping is: category alone ("3 cups"), category
// plus color ("2 red cups and a blue cup"), category plus region, or all three.
// Fields that are not selected are simply absent from the key, so two objects
// that differ only in an unselected field fall into the same group.
//
// Groups come out in the order their first member was seen. The order carries no
// meaning, but it is stable, which keeps the final sentence deterministic for a
// given input order.

use crate::core_modules::color::Color;
use crate::core_modules::feature::ObjectFeature;
use crate::core_modules::position::Region;
use std::collections::HashMap;

/// The subset of an `ObjectFeature` a group is keyed on. Category is always present.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct GroupKey {
    pub category: String,
    pub color: Option<Color>,
    pub region: Option<Region>,
}

impl GroupKey {
    pub fn new(category: impl Into<String>, color: Option<Color>, region: Option<Region>) -> Self {
        Self {
            category: category.into(),
            color,
            region,
        }
    }

    fn reduce(feature: &ObjectFeature, include_color: bool, include_position: bool) -> Self {
        Self {
            category: feature.category.clone(),
            color: include_color.then_some(feature.color),
            region: include_position.then_some(feature.region),
        }
    }
}

/// A count of observations sharing one `GroupKey`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeatureGroup {
    pub key: GroupKey,
    pub count: usize,
}

impl FeatureGroup {
    pub fn new(key: GroupKey, count: usize) -> Self {
        Self { key, count }
    }
}

pub fn aggregate(features: &[ObjectFeature], include_color: bool, include_position: bool) -> Vec<FeatureGroup> {
    let mut groups: Vec<FeatureGroup> = Vec::new();
    let mut index_by_key: HashMap<GroupKey, usize> = HashMap::new();

    for feature in features {
        let key = GroupKey::reduce(feature, include_color, include_position);
        match index_by_key.get(&key) {
            Some(&index) => groups[index].count += 1,
            None => {
                index_by_key.insert(key.clone(), groups.len());
                groups.push(FeatureGroup::new(key, 1));
            }
        }
    }

    groups
}
