use std::cmp::Ordering;

use crate::models::Hit;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortKey {
    #[default]
    None,
    Title,
    Author,
    Comments,
    Points,
}

type Comparator = fn(&Hit, &Hit) -> Ordering;

impl SortKey {
    /// Column order in the results table.
    pub const COLUMNS: [SortKey; 4] = [SortKey::Title, SortKey::Author, SortKey::Comments, SortKey::Points];

    pub fn label(self) -> &'static str {
        match self {
            SortKey::None => "",
            SortKey::Title => "Title",
            SortKey::Author => "Author",
            SortKey::Comments => "Comments",
            SortKey::Points => "Points",
        }
    }

    fn comparator(self) -> Option<Comparator> {
        match self {
            SortKey::None => None,
            SortKey::Title => Some(by_title as Comparator),
            SortKey::Author => Some(by_author as Comparator),
            SortKey::Comments => Some(by_comments as Comparator),
            SortKey::Points => Some(by_points as Comparator),
        }
    }
}

// Strings sort ascending, counts sort highest-first.
fn by_title(a: &Hit, b: &Hit) -> Ordering {
    a.title.cmp(&b.title)
}

fn by_author(a: &Hit, b: &Hit) -> Ordering {
    a.author.cmp(&b.author)
}

fn by_comments(a: &Hit, b: &Hit) -> Ordering {
    b.num_comments.cmp(&a.num_comments)
}

fn by_points(a: &Hit, b: &Hit) -> Ordering {
    b.points.cmp(&a.points)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SortState {
    pub key: SortKey,
    pub reverse: bool,
}

/// What a column header should show for its key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortIndicator {
    Unsorted,
    Ascending,
    Descending,
}

impl SortIndicator {
    pub fn symbol(self) -> &'static str {
        match self {
            SortIndicator::Unsorted => "↕",
            SortIndicator::Ascending => "⬆",
            SortIndicator::Descending => "⬇",
        }
    }
}

#[derive(Debug, Default)]
pub struct SortController {
    state: SortState,
}

impl SortController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> SortState {
        self.state
    }

    /// Same key flips direction, a new key starts over unreversed.
    pub fn toggle(&mut self, key: SortKey) {
        if self.state.key == key {
            self.state.reverse = !self.state.reverse;
        } else {
            self.state = SortState { key, reverse: false };
        }
    }

    pub fn indicator(&self, key: SortKey) -> SortIndicator {
        match (self.state.key == key, self.state.reverse) {
            (true, false) => SortIndicator::Ascending,
            (true, true) => SortIndicator::Descending,
            (false, _) => SortIndicator::Unsorted,
        }
    }

    /// Ordered copy of `hits`. Equal keys keep their input order in both
    /// directions; with no key, `reverse` flips the input order itself.
    pub fn order(&self, hits: &[Hit]) -> Vec<Hit> {
        let mut ordered = hits.to_vec();

        match self.state.key.comparator() {
            Some(compare) if self.state.reverse => ordered.sort_by(|a, b| compare(b, a)),
            Some(compare) => ordered.sort_by(compare),
            None if self.state.reverse => ordered.reverse(),
            None => {}
        }

        ordered
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::hit;

    fn controller(key: SortKey, reverse: bool) -> SortController {
        SortController { state: SortState { key, reverse } }
    }

    fn points(hits: &[Hit]) -> Vec<i64> {
        hits.iter().map(|h| h.points).collect()
    }

    fn titles(hits: &[Hit]) -> Vec<&str> {
        hits.iter().map(|h| h.title.as_str()).collect()
    }

    fn ids(hits: &[Hit]) -> Vec<&str> {
        hits.iter().map(|h| h.id.as_str()).collect()
    }

    #[test]
    fn starts_unsorted() {
        let sort = SortController::new();
        assert_eq!(sort.state(), SortState { key: SortKey::None, reverse: false });
    }

    #[test]
    fn toggle_same_key_flips_and_new_key_resets() {
        let mut sort = SortController::new();

        sort.toggle(SortKey::Title);
        assert_eq!(sort.state(), SortState { key: SortKey::Title, reverse: false });

        sort.toggle(SortKey::Title);
        assert_eq!(sort.state(), SortState { key: SortKey::Title, reverse: true });

        sort.toggle(SortKey::Author);
        assert_eq!(sort.state(), SortState { key: SortKey::Author, reverse: false });

        sort.toggle(SortKey::Author);
        sort.toggle(SortKey::Author);
        assert_eq!(sort.state(), SortState { key: SortKey::Author, reverse: false });
    }

    #[test]
    fn points_sort_highest_first() {
        let hits = vec![hit("a", "a", "x", 0, 1), hit("b", "b", "x", 0, 5), hit("c", "c", "x", 0, 3)];

        assert_eq!(points(&controller(SortKey::Points, false).order(&hits)), vec![5, 3, 1]);
        assert_eq!(points(&controller(SortKey::Points, true).order(&hits)), vec![1, 3, 5]);
    }

    #[test]
    fn comments_sort_highest_first() {
        let hits = vec![hit("a", "a", "x", 2, 0), hit("b", "b", "x", 10, 0), hit("c", "c", "x", 0, 0)];
        let ordered = controller(SortKey::Comments, false).order(&hits);
        assert_eq!(ids(&ordered), vec!["b", "a", "c"]);
    }

    #[test]
    fn title_sorts_ascending_case_sensitive() {
        let hits = vec![hit("1", "b", "x", 0, 0), hit("2", "a", "x", 0, 0)];

        assert_eq!(titles(&controller(SortKey::Title, false).order(&hits)), vec!["a", "b"]);
        assert_eq!(titles(&controller(SortKey::Title, true).order(&hits)), vec!["b", "a"]);

        let mixed = vec![hit("1", "apple", "x", 0, 0), hit("2", "Zebra", "x", 0, 0), hit("3", "", "x", 0, 0)];
        assert_eq!(titles(&controller(SortKey::Title, false).order(&mixed)), vec!["", "Zebra", "apple"]);
    }

    #[test]
    fn author_sorts_ascending() {
        let hits = vec![hit("1", "t", "mark", 0, 0), hit("2", "t", "dan", 0, 0)];
        let ordered = controller(SortKey::Author, false).order(&hits);
        assert_eq!(ids(&ordered), vec!["2", "1"]);
    }

    #[test]
    fn ties_keep_input_order_both_ways() {
        let hits = vec![hit("a", "t", "x", 0, 2), hit("b", "t", "x", 0, 2), hit("c", "t", "x", 0, 9)];

        assert_eq!(ids(&controller(SortKey::Points, false).order(&hits)), vec!["c", "a", "b"]);
        assert_eq!(ids(&controller(SortKey::Points, true).order(&hits)), vec!["a", "b", "c"]);
    }

    #[test]
    fn no_key_keeps_or_reverses_input() {
        let hits = vec![hit("a", "z", "x", 0, 1), hit("b", "a", "x", 0, 9)];

        assert_eq!(ids(&controller(SortKey::None, false).order(&hits)), vec!["a", "b"]);
        assert_eq!(ids(&controller(SortKey::None, true).order(&hits)), vec!["b", "a"]);
    }

    #[test]
    fn order_leaves_input_untouched() {
        let hits = vec![hit("a", "a", "x", 0, 1), hit("b", "b", "x", 0, 5)];
        let _ = controller(SortKey::Points, false).order(&hits);
        assert_eq!(ids(&hits), vec!["a", "b"]);
        assert!(controller(SortKey::Title, true).order(&[]).is_empty());
    }

    #[test]
    fn indicator_follows_active_key() {
        let mut sort = SortController::new();
        assert_eq!(sort.indicator(SortKey::Title), SortIndicator::Unsorted);

        sort.toggle(SortKey::Title);
        assert_eq!(sort.indicator(SortKey::Title), SortIndicator::Ascending);
        assert_eq!(sort.indicator(SortKey::Points), SortIndicator::Unsorted);

        sort.toggle(SortKey::Title);
        assert_eq!(sort.indicator(SortKey::Title), SortIndicator::Descending);
    }
}
