//! Grouping endpoints by polling interval.

use std::collections::BTreeMap;
use std::sync::Arc;

use crate::endpoint::Endpoint;
use crate::interval::Interval;

/// Endpoints that share one polling interval.
///
/// Members keep the order in which they appeared in the input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IntervalGroup {
    pub interval: Interval,
    pub members: Vec<Arc<Endpoint>>,
}

impl IntervalGroup {
    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}

/// Partition endpoints into one group per distinct interval.
///
/// Groups are returned in ascending interval order.
pub fn group_by_interval<I>(endpoints: I) -> Vec<IntervalGroup>
where
    I: IntoIterator<Item = Endpoint>,
{
    let mut groups: BTreeMap<Interval, Vec<Arc<Endpoint>>> = BTreeMap::new();
    for endpoint in endpoints {
        groups
            .entry(endpoint.interval)
            .or_default()
            .push(Arc::new(endpoint));
    }

    groups
        .into_iter()
        .map(|(interval, members)| IntervalGroup { interval, members })
        .collect()
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;
    use std::time::Duration;

    use super::*;

    fn endpoint(name: &str, secs: u64) -> Endpoint {
        Endpoint {
            name: name.to_string(),
            url: format!("http://localhost/{name}").parse().unwrap(),
            interval: Interval::from_secs(secs).unwrap(),
            timeout: Duration::from_secs(3),
        }
    }

    #[test]
    fn empty_input_has_no_groups() {
        assert!(group_by_interval(Vec::new()).is_empty());
    }

    #[test]
    fn one_group_per_distinct_interval() {
        let endpoints = vec![
            endpoint("a", 30),
            endpoint("b", 60),
            endpoint("c", 30),
            endpoint("d", 5),
            endpoint("e", 60),
        ];
        let groups = group_by_interval(endpoints.clone());

        let distinct: HashSet<_> = endpoints.iter().map(|e| e.interval).collect();
        assert_eq!(groups.len(), distinct.len());

        let keys: Vec<u64> = groups.iter().map(|g| g.interval.as_secs()).collect();
        assert_eq!(keys, vec![5, 30, 60]);
    }

    #[test]
    fn every_endpoint_lands_in_exactly_one_group() {
        let endpoints = vec![
            endpoint("a", 30),
            endpoint("b", 60),
            endpoint("c", 30),
            endpoint("d", 60),
        ];
        let groups = group_by_interval(endpoints.clone());

        let total: usize = groups.iter().map(IntervalGroup::len).sum();
        assert_eq!(total, endpoints.len());

        for ep in &endpoints {
            let owners = groups
                .iter()
                .filter(|g| g.members.iter().any(|m| m.name == ep.name))
                .count();
            assert_eq!(owners, 1, "{} must belong to one group", ep.name);
        }

        for group in &groups {
            assert!(group.members.iter().all(|m| m.interval == group.interval));
        }
    }

    #[test]
    fn members_keep_input_order() {
        let groups = group_by_interval(vec![
            endpoint("z", 10),
            endpoint("a", 10),
            endpoint("m", 10),
        ]);
        assert_eq!(groups.len(), 1);
        let names: Vec<&str> = groups[0].members.iter().map(|m| m.name.as_str()).collect();
        assert_eq!(names, vec!["z", "a", "m"]);
    }

    #[test]
    fn equal_values_from_different_tokens_share_a_group() {
        let mut one_minute = endpoint("minute", 60);
        one_minute.interval = "1m".parse().unwrap();
        let mut sixty = endpoint("sixty", 60);
        sixty.interval = "60s".parse().unwrap();

        let groups = group_by_interval(vec![one_minute, sixty]);
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].len(), 2);
    }
}
