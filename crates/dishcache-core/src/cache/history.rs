//! Newest-first bounded lists with unique keys.

/// Put `item` at the front, dropping any entry with the same key, then cut
/// the list down to `max` entries. Returns the replaced entry, if any.
pub fn push_front_unique<T, K, F>(list: &mut Vec<T>, item: T, max: usize, key: F) -> Option<T>
where
    K: PartialEq,
    F: Fn(&T) -> K,
{
    let item_key = key(&item);
    let replaced = list
        .iter()
        .position(|existing| key(existing) == item_key)
        .map(|index| list.remove(index));
    list.insert(0, item);
    list.truncate(max);
    replaced
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_key_goes_first() {
        let mut list = vec![2, 1];
        assert!(push_front_unique(&mut list, 3, 10, |x| *x).is_none());
        assert_eq!(list, vec![3, 2, 1]);
    }

    #[test]
    fn test_existing_key_moves_to_front() {
        let mut list = vec!["c", "b", "a"];
        let replaced = push_front_unique(&mut list, "a", 10, |x| *x);
        assert_eq!(replaced, Some("a"));
        assert_eq!(list, vec!["a", "c", "b"]);
    }

    #[test]
    fn test_truncates_oldest() {
        let mut list: Vec<u32> = (1..=5).rev().collect();
        push_front_unique(&mut list, 6, 5, |x| *x);
        assert_eq!(list, vec![6, 5, 4, 3, 2]);
    }

    #[test]
    fn test_never_exceeds_max_or_duplicates() {
        let mut list = Vec::new();
        for i in 0..200u32 {
            push_front_unique(&mut list, i % 7, 4, |x| *x);
            assert!(list.len() <= 4);
            let mut sorted = list.clone();
            sorted.sort();
            sorted.dedup();
            assert_eq!(sorted.len(), list.len());
        }
    }

    #[test]
    fn test_zero_max_keeps_nothing() {
        let mut list = vec![1];
        push_front_unique(&mut list, 2, 0, |x| *x);
        assert!(list.is_empty());
    }
}
