use std::sync::Arc;

use log::debug;

use super::{NodeId, Quantity, Tree};
use crate::substance::{Constituent, Error, Fraction};

/// Quantities attached to the nodes of trees built from substances.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeOptions {
    /// Multiply fractions by the fractions of all ancestors, so that a node
    /// shows its share of the root instead of its share of its parent.
    pub scale: bool,
    pub atomic: bool,
    pub weight: bool,
    pub volume: bool,
    pub molar_mass: bool,
    pub density: bool,
    /// Render isotopes at the maximum depth with labels of equal width.
    pub align_isotopes: bool,
}

impl Default for TreeOptions {
    fn default() -> Self {
        Self {
            scale: false,
            atomic: true,
            weight: false,
            volume: false,
            molar_mass: false,
            density: false,
            align_isotopes: true,
        }
    }
}

/// Fractions of one node; `None` where not requested or not computable.
#[derive(Debug, Clone, Copy, Default)]
struct Shares {
    atomic: Option<f64>,
    weight: Option<f64>,
    volume: Option<f64>,
}

impl Shares {
    fn root(options: &TreeOptions) -> Self {
        Self {
            atomic: options.atomic.then_some(1.0),
            weight: options.weight.then_some(1.0),
            volume: options.volume.then_some(1.0),
        }
    }
}

pub(crate) fn input_tree(root: &Constituent, options: &TreeOptions) -> Tree {
    let mut tree = Tree::new(root.name(), Some(root.clone()));
    let id = tree.root();
    let shares = Shares::root(options);
    annotate(&mut tree, id, root, shares, options);
    expand(&mut tree, id, root, shares, options);
    align_isotopes(&mut tree, options);
    tree
}

/// Root, then every element of the graph, then the isotopes of each element.
///
/// Element fractions are totals over the whole graph. Fails if weight
/// fractions are requested and a molar mass on the way down is unknown.
pub(crate) fn composition_tree(root: &Constituent, options: &TreeOptions) -> Result<Tree, Error> {
    let mut tree = Tree::new(root.name(), Some(root.clone()));
    let root_id = tree.root();
    let shares = Shares {
        volume: None,
        ..Shares::root(options)
    };
    annotate(&mut tree, root_id, root, shares, options);

    let weight = if options.weight {
        Some(root.elements(Fraction::Weight)?)
    } else {
        None
    };
    for (key, x) in root.elements(Fraction::Atomic)? {
        let shares = Shares {
            atomic: options.atomic.then_some(x),
            weight: weight.as_ref().and_then(|w| w.get(&key).copied()),
            volume: None,
        };
        let element = Constituent::Element(Arc::clone(&key.0));
        let id = tree.attach(root_id, element.name().to_string(), Some(element.clone()));
        annotate(&mut tree, id, &element, shares, options);
        expand(&mut tree, id, &element, shares, options);
    }

    align_isotopes(&mut tree, options);
    Ok(tree)
}

fn annotate(
    tree: &mut Tree,
    id: NodeId,
    constituent: &Constituent,
    shares: Shares,
    options: &TreeOptions,
) {
    let data = &mut tree.node_mut(id).data;
    let fractions = [
        (Quantity::AtomicFraction, shares.atomic),
        (Quantity::WeightFraction, shares.weight),
        (Quantity::VolumeFraction, shares.volume),
    ];
    for (quantity, value) in fractions {
        if let Some(value) = value {
            data.insert(quantity, value);
        }
    }

    let molar_mass = constituent.molar_mass();
    if options.molar_mass && molar_mass > 0.0 {
        data.insert(Quantity::MolarMass, molar_mass);
    }
    let density = constituent.density();
    if options.density && density > 0.0 {
        data.insert(Quantity::Density, density);
    }
}

fn expand(
    tree: &mut Tree,
    parent: NodeId,
    constituent: &Constituent,
    shares: Shares,
    options: &TreeOptions,
) {
    let Some(core) = constituent.core() else {
        return;
    };

    let local = |requested: bool, fractions: Result<Vec<f64>, Error>, what: &str| {
        if !requested {
            return None;
        }
        fractions
            .inspect_err(|e| debug!("omitting {what} fractions below \"{}\": {e}", core.name()))
            .ok()
    };
    let atomic = local(options.atomic, Ok(core.composition().fractions()), "atomic");
    let weight = local(options.weight, core.weight_fractions(), "weight");
    let volume = local(options.volume, core.volume_fractions(), "volume");

    let share = |parent: Option<f64>, local: &Option<Vec<f64>>, i: usize| {
        let local = local.as_ref().map(|v| v[i]);
        if options.scale {
            Some(parent? * local?)
        } else {
            local
        }
    };

    for (i, child) in core.composition().constituents().enumerate() {
        let child_shares = Shares {
            atomic: share(shares.atomic, &atomic, i),
            weight: share(shares.weight, &weight, i),
            volume: share(shares.volume, &volume, i),
        };
        let id = tree.attach(parent, child.name().to_string(), Some(child.clone()));
        annotate(tree, id, child, child_shares, options);
        expand(tree, id, child, child_shares, options);
    }
}

fn align_isotopes(tree: &mut Tree, options: &TreeOptions) {
    if !options.align_isotopes {
        return;
    }
    let isotopes: Vec<NodeId> = tree
        .iter()
        .filter(|n| n.content().is_some_and(|c| c.as_isotope().is_some()))
        .map(|n| n.id())
        .collect();
    let size = isotopes
        .iter()
        .map(|&id| tree[id].label().chars().count())
        .max()
        .unwrap_or(0);
    for id in isotopes {
        let node = tree.node_mut(id);
        node.right_align = true;
        node.label = format!("{:>size$}", node.label);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::isotope::Isotope;
    use crate::substance::{Element, InputMode, Mixture, Molecule, Substance, SubstanceOptions};
    use crate::tree::{CharSet, RenderOptions};

    fn approx_eq(a: f64, b: f64, eps: f64) -> bool {
        (a - b).abs() <= eps
    }

    fn hydrogen() -> Element {
        Element::legacy(
            "hydrogen",
            [
                (Isotope::new(1, 1, 1.00782503223), 0.999885),
                (Isotope::new(1, 2, 2.01410177812), 0.000115),
            ],
        )
        .unwrap()
    }

    fn oxygen() -> Element {
        Element::legacy("oxygen", [(Isotope::new(8, 16, 15.99491461957), 1.0)]).unwrap()
    }

    fn uranium() -> Element {
        Element::new(
            "uranium",
            [
                (Isotope::new(92, 235, 235.0439301), 0.5),
                (Isotope::new(92, 238, 238.0507884), 0.5),
            ],
            InputMode::Atomic,
            SubstanceOptions::default().with_density(19.1),
        )
        .unwrap()
    }

    fn sum_of_children(tree: &Tree, id: NodeId, quantity: Quantity) -> f64 {
        tree[id]
            .children()
            .iter()
            .filter_map(|&c| tree[c].get(quantity))
            .sum()
    }

    #[test]
    fn element_tree_renders_exactly() {
        let tree = hydrogen().input_tree(&TreeOptions::default());
        let expected = concat!(
            "Element \"hydrogen\": 100.0000 at.%\n",
            "├── Isotope \"H-1\":  99.9885 at.%\n",
            "└── Isotope \"H-2\":   0.0115 at.%\n",
        );
        assert_eq!(tree.render(&RenderOptions::default()), expected);
    }

    #[test]
    fn isotopes_align_at_maximum_depth() {
        let water = Molecule::legacy("water", [(hydrogen(), 2.0), (oxygen(), 1.0)]).unwrap();
        let fuel = Mixture::legacy(
            "fuel",
            [
                (Constituent::from(uranium()), 1.0),
                (Constituent::from(water), 2.0),
            ],
        )
        .unwrap();
        let tree = fuel.input_tree(&TreeOptions::default());
        assert_eq!(tree.max_depth(), 3);

        let h1 = tree.nodes_by_label("  H-1");
        assert_eq!(h1.len(), 1);
        assert!(tree[h1[0]].is_right_aligned());

        let options = RenderOptions {
            char_set: CharSet::Basic,
            ..Default::default()
        };
        let rendered = tree.render(&options);
        let u235 = rendered.lines().find(|l| l.contains("U-235")).unwrap();
        assert!(u235.starts_with("|   +------ Isotope \"U-235\":"));
        let o16 = rendered.lines().find(|l| l.contains("O-16")).unwrap();
        assert!(o16.starts_with("        +-- Isotope  \"O-16\":"));
    }

    #[test]
    fn scaled_fractions_are_shares_of_the_root() {
        let mix = Mixture::legacy("mix", [(uranium(), 1.0), (hydrogen(), 1.0)]).unwrap();
        let local = mix.input_tree(&TreeOptions::default());
        let scaled = mix.input_tree(&TreeOptions {
            scale: true,
            ..Default::default()
        });

        let u235 = |tree: &Tree| {
            let id = tree.nodes_by_label("U-235")[0];
            tree[id].get(Quantity::AtomicFraction).unwrap()
        };
        assert!(approx_eq(u235(&local), 0.5, 1e-12));
        assert!(approx_eq(u235(&scaled), 0.25, 1e-12));

        for tree in [&local, &scaled] {
            let root = tree.root();
            assert!(approx_eq(
                sum_of_children(tree, root, Quantity::AtomicFraction),
                1.0,
                1e-12
            ));
        }
        let uranium_id = scaled.nodes_by_label("uranium")[0];
        assert!(approx_eq(
            sum_of_children(&scaled, uranium_id, Quantity::AtomicFraction),
            0.5,
            1e-12
        ));
    }

    #[test]
    fn uncomputable_fractions_are_omitted() {
        let mix = Mixture::legacy("mix", [(uranium(), 1.0), (hydrogen(), 1.0)]).unwrap();
        let options = TreeOptions {
            weight: true,
            volume: true,
            molar_mass: true,
            density: true,
            ..Default::default()
        };
        let tree = mix.input_tree(&options);
        let uranium_id = tree.nodes_by_label("uranium")[0];
        assert!(tree[uranium_id].get(Quantity::WeightFraction).is_some());
        assert!(tree[uranium_id].get(Quantity::VolumeFraction).is_none());
        assert_eq!(tree[uranium_id].get(Quantity::Density), Some(19.1));

        let u235 = tree.nodes_by_label("U-235")[0];
        assert!(tree[u235].get(Quantity::WeightFraction).is_some());
        assert!(tree[u235].get(Quantity::VolumeFraction).is_none());
        assert!(tree[u235].get(Quantity::MolarMass).unwrap() > 235.0);
        assert!(tree[u235].get(Quantity::Density).is_none());
    }

    #[test]
    fn composition_tree_lists_elements_then_isotopes() {
        let water = Molecule::legacy("water", [(hydrogen(), 2.0), (oxygen(), 1.0)]).unwrap();
        let wet = Mixture::legacy(
            "wet",
            [
                (Constituent::from(water), 1.0),
                (Constituent::from(hydrogen()), 1.0),
            ],
        )
        .unwrap();
        let tree = wet.composition_tree(&TreeOptions::default()).unwrap();
        let root = tree.root();
        let labels: Vec<&str> = tree[root]
            .children()
            .iter()
            .map(|&c| tree[c].label())
            .collect();
        assert_eq!(labels, vec!["hydrogen", "oxygen"]);
        assert_eq!(tree.max_depth(), 2);
        let h = tree[root].children()[0];
        assert!(approx_eq(
            tree[h].get(Quantity::AtomicFraction).unwrap(),
            5.0 / 6.0,
            1e-12
        ));
    }

    #[test]
    fn composition_tree_needs_molar_masses_for_weight() {
        let unknown = Molecule::new(
            "unknown",
            Vec::<(Element, f64)>::new(),
            InputMode::Atomic,
            SubstanceOptions::default(),
        )
        .unwrap();
        let mix = Mixture::legacy(
            "mix",
            [
                (Constituent::from(unknown), 1.0),
                (Constituent::from(oxygen()), 1.0),
            ],
        )
        .unwrap();
        let options = TreeOptions {
            weight: true,
            ..Default::default()
        };
        assert!(mix.composition_tree(&options).is_err());
        assert!(mix.composition_tree(&TreeOptions::default()).is_ok());
    }
}
