use crate::models::{ Listing, ListingTree };
use std::collections::HashMap;
use tracing::debug;

pub const SOLUTIONS_TITLE: &str = "Solutions";
pub const DEFAULT_CONTAINER_ID: &str = "solution_display";
pub const LINK_CLASS: &str = "solution_file";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Element {
    Group(Group),
    Link(Link),
}

/// Collapsible group of links and nested groups.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Group {
    pub title: String,
    pub open: bool,
    pub children: Vec<Element>,
}

/// Link to a single file, opened in a browser context named after the file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Link {
    pub label: String,
    pub href: String,
    pub target: String,
    pub class: String,
}

impl Link {
    fn to_file(prefix: &str, key: &str) -> Self {
        Link {
            label: key.to_string(),
            href: join_path(prefix, key),
            target: format!("_{}", key),
            class: LINK_CLASS.to_string(),
        }
    }
}

impl Group {
    pub fn new(title: &str) -> Self {
        Group {
            title: title.to_string(),
            open: true,
            children: Vec::new(),
        }
    }

    /// Every link href under this group, in document order.
    pub fn leaf_paths(&self) -> Vec<String> {
        let mut paths = Vec::new();
        collect_paths(&self.children, &mut paths);
        paths
    }

    /// Levels of groups from here down; a group without subgroups has depth 1.
    pub fn depth(&self) -> usize {
        1 +
            self.children
                .iter()
                .filter_map(|child| {
                    match child {
                        Element::Group(group) => Some(group.depth()),
                        Element::Link(_) => None,
                    }
                })
                .max()
                .unwrap_or(0)
    }
}

fn collect_paths(children: &[Element], paths: &mut Vec<String>) {
    for child in children {
        match child {
            Element::Link(link) => paths.push(link.href.clone()),
            Element::Group(group) => collect_paths(&group.children, paths),
        }
    }
}

/// The element a rendered listing is attached to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Container {
    pub id: String,
    pub children: Vec<Element>,
}

impl Container {
    pub fn new(id: &str) -> Self {
        Container {
            id: id.to_string(),
            children: Vec::new(),
        }
    }

    pub fn append(&mut self, element: Element) {
        self.children.push(element);
    }
}

impl Default for Container {
    fn default() -> Self {
        Container::new(DEFAULT_CONTAINER_ID)
    }
}

fn join_path(prefix: &str, key: &str) -> String {
    if prefix.is_empty() { key.to_string() } else { format!("{}/{}", prefix, key) }
}

/// Renders one directory as a group titled `title`. Entries are visited in
/// ascending key order; files become links below `prefix` and directories
/// become nested groups.
pub fn render(title: &str, prefix: &str, entries: &HashMap<String, ListingTree>) -> Group {
    let mut group = Group::new(title);
    let mut keys: Vec<&String> = entries.keys().collect();
    keys.sort();

    for key in keys {
        match &entries[key] {
            ListingTree::File => {
                group.children.push(Element::Link(Link::to_file(prefix, key)));
            }
            ListingTree::Directory(sub) => {
                let child = render(key, &join_path(prefix, key), sub);
                group.children.push(Element::Group(child));
            }
        }
    }
    group
}

/// Renders the whole listing under "Solutions" and attaches it to `container`.
pub fn build_solution_links(listing: Listing, container: &mut Container) {
    build_prefixed_links(listing, "", container);
}

/// Like [`build_solution_links`], with every link placed below `prefix`.
pub fn build_prefixed_links(listing: Listing, prefix: &str, container: &mut Container) {
    let group = render(SOLUTIONS_TITLE, prefix, &listing.entries);
    debug!(container = %container.id, links = group.leaf_paths().len(), "rendered listing");
    container.append(Element::Group(group));
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::collections::BTreeSet;

    fn listing(json: &str) -> Listing {
        serde_json::from_str(json).unwrap()
    }

    fn link(label: &str, href: &str) -> Element {
        Element::Link(Link {
            label: label.to_string(),
            href: href.to_string(),
            target: format!("_{}", label),
            class: LINK_CLASS.to_string(),
        })
    }

    #[test]
    fn renders_files_before_nested_directory() {
        let mut container = Container::default();
        build_solution_links(listing(r#"{"sub": {"b.txt": "F"}, "a.txt": "F"}"#), &mut container);

        let expected = Element::Group(Group {
            title: "Solutions".to_string(),
            open: true,
            children: vec![
                link("a.txt", "a.txt"),
                Element::Group(Group {
                    title: "sub".to_string(),
                    open: true,
                    children: vec![link("b.txt", "sub/b.txt")],
                })
            ],
        });
        assert_eq!(container.id, "solution_display");
        assert_eq!(container.children, vec![expected]);
    }

    #[test]
    fn empty_listing_renders_empty_group() {
        let group = render("Solutions", "", &HashMap::new());
        assert_eq!(group, Group::new("Solutions"));
        assert!(group.children.is_empty());
        assert_eq!(group.depth(), 1);
    }

    #[test]
    fn siblings_are_sorted() {
        let names = ["zeta", "Beta", "alpha", "b10", "b2", "_x", "ä", "0"];
        let mut entries = HashMap::new();
        for name in names {
            entries.insert(name.to_string(), ListingTree::File);
        }

        let labels: Vec<String> = render("t", "", &entries)
            .children.into_iter()
            .map(|child| {
                match child {
                    Element::Link(link) => link.label,
                    Element::Group(_) => unreachable!(),
                }
            })
            .collect();

        let mut sorted: Vec<String> = names
            .iter()
            .map(|n| n.to_string())
            .collect();
        sorted.sort();
        assert_eq!(labels, sorted);
        assert!(labels.windows(2).all(|w| w[0] < w[1]));
    }

    fn expected_paths(prefix: &str, tree: &ListingTree, out: &mut Vec<String>) {
        match tree {
            ListingTree::File => out.push(prefix.to_string()),
            ListingTree::Directory(entries) => {
                for (key, sub) in entries {
                    expected_paths(&join_path(prefix, key), sub, out);
                }
            }
        }
    }

    #[test]
    fn every_file_is_linked_exactly_once() {
        let listing = listing(
            r#"{
                "hw1": {"p1.py": "F", "p2.py": "F", "data": {"in.txt": "F", "out.txt": "F"}},
                "hw2": {},
                "readme.md": "F",
                "labs": {"l1": {"a": {"b": {"deep.txt": "F"}}}}
            }"#
        );
        let tree = ListingTree::from(listing.clone());
        let mut expected = Vec::new();
        expected_paths("", &tree, &mut expected);

        let rendered = render("Solutions", "", &listing.entries).leaf_paths();

        assert_eq!(rendered.len(), tree.file_count());
        let rendered_set: BTreeSet<_> = rendered.iter().cloned().collect();
        assert_eq!(rendered_set.len(), rendered.len());
        assert_eq!(rendered_set, expected.into_iter().collect::<BTreeSet<_>>());
        assert!(rendered.contains(&"labs/l1/a/b/deep.txt".to_string()));
    }

    #[test]
    fn prefix_and_target_follow_key() {
        let listing = listing(r#"{"x.c": "F"}"#);
        let group = render("hw", "course/hw", &listing.entries);
        assert_eq!(group.children, vec![Element::Link(Link {
            label: "x.c".to_string(),
            href: "course/hw/x.c".to_string(),
            target: "_x.c".to_string(),
            class: "solution_file".to_string(),
        })]);
    }

    #[test]
    fn served_prefix_applies_to_every_link() {
        let mut container = Container::default();
        build_prefixed_links(
            listing(r#"{"a.txt": "F", "sub": {"b.txt": "F"}}"#),
            "solution",
            &mut container
        );
        match &container.children[0] {
            Element::Group(group) => {
                assert_eq!(group.title, "Solutions");
                assert_eq!(group.leaf_paths(), vec!["solution/a.txt", "solution/sub/b.txt"]);
            }
            Element::Link(_) => panic!("expected a group"),
        }
    }

    #[test]
    fn rendering_twice_is_identical() {
        let json = r#"{"b": {"c": {"d.txt": "F"}}, "a.txt": "F", "e": {}}"#;
        let mut first = Container::default();
        let mut second = Container::default();
        build_solution_links(listing(json), &mut first);
        build_solution_links(listing(json), &mut second);

        assert_eq!(first, second);
        match &first.children[0] {
            Element::Group(group) => assert_eq!(group.depth(), 3),
            Element::Link(_) => panic!("expected a group"),
        }
    }
}
