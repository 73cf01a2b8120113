/// Lazy iterator over the alias candidates of a site-relative path
///
/// For `news/archive/item`, yields: `news/archive/item` → `news/archive` → `news`
///
/// Candidates come out longest first, which is the order the alias matcher
/// relies on for its longest-alias-wins rule.
///
/// # Performance
///
/// - **Allocations**: Zero (only borrows from input string)
/// - **Complexity**: O(depth) where depth is path levels
///
/// # Examples
///
/// ```
/// use pagetree_router::path::AliasHierarchy;
///
/// let aliases: Vec<&str> = AliasHierarchy::new("news/archive/item").collect();
/// assert_eq!(aliases, vec!["news/archive/item", "news/archive", "news"]);
/// ```
#[derive(Debug, Clone)]
pub struct AliasHierarchy<'a> {
    current: Option<&'a str>,
}

impl<'a> AliasHierarchy<'a> {
    /// Creates a new hierarchy iterator starting from the full path
    pub fn new(path: &'a str) -> Self {
        Self {
            current: if path.is_empty() { None } else { Some(path) },
        }
    }
}

impl<'a> Iterator for AliasHierarchy<'a> {
    type Item = &'a str;

    /// Returns the next (shorter) alias candidate
    ///
    /// 1. Yield the current candidate
    /// 2. Cut at the last `/` for the next one
    /// 3. Stop once there is no `/` left, or the cut would leave nothing
    fn next(&mut self) -> Option<Self::Item> {
        let current = self.current?;

        self.current = match current.rfind('/') {
            Some(slash_pos) if slash_pos > 0 => Some(&current[..slash_pos]),
            _ => None,
        };

        Some(current)
    }
}
