use std::io::{self, Write};

use super::{CharSet, Node, NodeId, Quantity, Tree};

/// Text layout of [`Tree::render`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderOptions {
    pub char_set: CharSet,
    /// Field width of fractions, given in percent.
    pub frac_width: usize,
    pub frac_precision: usize,
    /// Field width of molar mass and density.
    pub prop_width: usize,
    pub prop_precision: usize,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            char_set: CharSet::BoxDrawingsLight,
            frac_width: 8,
            frac_precision: 4,
            prop_width: 0,
            prop_precision: 4,
        }
    }
}

struct Glyphs {
    inter: String,
    last: String,
    fill: String,
    vert: String,
    empty: String,
}

impl From<CharSet> for Glyphs {
    fn from(cs: CharSet) -> Self {
        Self {
            inter: cs.inter(),
            last: cs.last(),
            fill: cs.fill(),
            vert: cs.vert(),
            empty: cs.empty(),
        }
    }
}

struct Renderer<'a> {
    tree: &'a Tree,
    options: &'a RenderOptions,
    glyphs: Glyphs,
    max_depth: usize,
    last_ones: Vec<bool>,
}

impl Renderer<'_> {
    fn node(&mut self, id: NodeId, out: &mut String) {
        let tree = self.tree;
        let node = &tree[id];
        out.push_str(&self.line(node));
        out.push('\n');

        if let Some((&last, rest)) = node.children.split_last() {
            self.last_ones[node.depth] = false;
            for &child in rest {
                self.node(child, out);
            }
            self.last_ones[node.depth] = true;
            self.node(last, out);
        }
    }

    fn line(&self, node: &Node) -> String {
        let mut prefix = String::new();
        if node.depth > 0 {
            for &last in &self.last_ones[..node.depth - 1] {
                prefix.push_str(if last { &self.glyphs.empty } else { &self.glyphs.vert });
            }
            prefix.push_str(if self.last_ones[node.depth - 1] {
                &self.glyphs.last
            } else {
                &self.glyphs.inter
            });
        }
        if node.right_align {
            prefix.truncate(prefix.trim_end().len());
            for _ in node.depth..self.max_depth {
                prefix.push_str(&self.glyphs.fill);
            }
            prefix.push(' ');
        }

        let label = format!("\"{}\"", node.label.trim());
        let width = node.label.chars().count() + 2;
        format!(
            "{prefix}{} {label:>width$}: {}",
            node.kind_name(),
            self.fields(node)
        )
    }

    fn fields(&self, node: &Node) -> String {
        let RenderOptions {
            frac_width: fw,
            frac_precision: fp,
            prop_width: pw,
            prop_precision: pp,
            ..
        } = *self.options;

        node.data
            .iter()
            .map(|(quantity, &value)| match quantity {
                Quantity::AtomicFraction => format!("{:>fw$.fp$} at.%", value * 1e2),
                Quantity::WeightFraction => format!("{:>fw$.fp$} wt.%", value * 1e2),
                Quantity::VolumeFraction => format!("{:>fw$.fp$} vol.%", value * 1e2),
                Quantity::MolarMass => format!("{value:>pw$.pp$} g/mol"),
                Quantity::Density => format!("{value:>pw$.pp$} g/cm^3"),
            })
            .collect::<Vec<_>>()
            .join("  |  ")
    }
}

impl Tree {
    /// Renders the tree, one line per node in pre-order.
    ///
    /// Each line is `<prefix><Kind> "<label>": <fields>`, where the prefix
    /// draws the ancestry and the fields are the node's quantities in the
    /// order at.%, wt.%, vol.%, g/mol, g/cm^3, separated by `"  |  "`.
    pub fn render(&self, options: &RenderOptions) -> String {
        let max_depth = self.max_depth();
        let mut renderer = Renderer {
            tree: self,
            options,
            glyphs: Glyphs::from(options.char_set),
            max_depth,
            last_ones: vec![false; max_depth],
        };
        let mut out = String::new();
        renderer.node(self.root(), &mut out);
        out
    }

    pub fn write_to<W: Write>(&self, mut writer: W, options: &RenderOptions) -> io::Result<()> {
        writer.write_all(self.render(options).as_bytes())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn basic() -> RenderOptions {
        RenderOptions {
            char_set: CharSet::Basic,
            ..Default::default()
        }
    }

    fn sample() -> Tree {
        let mut tree = Tree::new("root", None);
        let root = tree.root();
        tree.insert_data(root, Quantity::AtomicFraction, 1.0).unwrap();
        let a = tree.add_child(root, "a", None).unwrap();
        tree.add_child(a, "a1", None).unwrap();
        tree.add_child(root, "b", None).unwrap();
        tree
    }

    #[test]
    fn prefixes_follow_ancestry() {
        let expected = concat!(
            "Node \"root\": 100.0000 at.%\n",
            "+-- Node \"a\": \n",
            "|   +-- Node \"a1\": \n",
            "+-- Node \"b\": \n",
        );
        assert_eq!(sample().render(&basic()), expected);
    }

    #[test]
    fn box_drawing_prefixes() {
        let expected = concat!(
            "Node \"root\": 100.0000 at.%\n",
            "├── Node \"a\": \n",
            "│   └── Node \"a1\": \n",
            "└── Node \"b\": \n",
        );
        assert_eq!(sample().render(&RenderOptions::default()), expected);
    }

    #[test]
    fn right_aligned_nodes_reach_max_depth() {
        let mut tree = sample();
        let b = tree.nodes_by_label("b")[0];
        tree.align_right(b, true, Some(3)).unwrap();
        let rendered = tree.render(&basic());
        assert_eq!(rendered.lines().last(), Some("+------ Node   \"b\": "));
    }

    #[test]
    fn fields_are_ordered_and_formatted() {
        let mut tree = Tree::new("x", None);
        let root = tree.root();
        tree.insert_data(root, Quantity::Density, 7.874).unwrap();
        tree.insert_data(root, Quantity::WeightFraction, 0.25).unwrap();
        tree.insert_data(root, Quantity::MolarMass, 55.845).unwrap();
        tree.insert_data(root, Quantity::AtomicFraction, 0.5).unwrap();
        tree.insert_data(root, Quantity::VolumeFraction, 0.125).unwrap();
        assert_eq!(
            tree.render(&basic()),
            "Node \"x\":  50.0000 at.%  |   25.0000 wt.%  |   12.5000 vol.%  |  55.8450 g/mol  |  7.8740 g/cm^3\n"
        );
    }

    #[test]
    fn precision_and_width_are_configurable() {
        let mut tree = Tree::new("x", None);
        let root = tree.root();
        tree.insert_data(root, Quantity::AtomicFraction, 0.5).unwrap();
        tree.insert_data(root, Quantity::MolarMass, 12.0).unwrap();
        let options = RenderOptions {
            frac_width: 6,
            frac_precision: 1,
            prop_width: 8,
            prop_precision: 2,
            ..basic()
        };
        assert_eq!(
            tree.render(&options),
            "Node \"x\":   50.0 at.%  |     12.00 g/mol\n"
        );
    }

    #[test]
    fn write_to_matches_render() {
        let tree = sample();
        let mut buffer = Vec::new();
        tree.write_to(&mut buffer, &basic()).unwrap();
        assert_eq!(String::from_utf8(buffer).unwrap(), tree.render(&basic()));
        assert_eq!(tree.to_string(), tree.render(&RenderOptions::default()));
    }
}
