pub mod properties;
pub mod section;
pub mod soma;

pub use properties::{CellFamily, FormatVersion, Properties, SectionProperties};
pub use section::{SectionData, SectionId, SectionType};
pub use soma::{Soma, SomaKind};

use std::collections::HashMap;

use slotmap::SlotMap;

use crate::error::BuilderError;
use crate::math::{Point3, Vector3};

/// Post-processing switches applied by [`Morphology::apply_modifiers`].
///
/// All switches default to off; `Options::default()` is a no-op.
#[derive(Debug, Clone, Copy, Default)]
pub struct Options {
    /// Stable-sort root sections and child lists by ascending SWC type code.
    pub nrn_order: bool,
    /// Keep only the first and last point of every section.
    pub two_points_sections: bool,
    /// Collapse a multi-point soma to a single centroid point.
    pub soma_sphere: bool,
    /// Drop the duplicated fork point at the head of child sections.
    pub no_duplicates: bool,
}

/// Central mutable store for a morphology under construction.
///
/// Sections reference each other via typed IDs (generational indices),
/// avoiding self-referential structures and enabling safe mutation.
#[derive(Debug, Default)]
pub struct Morphology {
    sections: SlotMap<SectionId, SectionData>,
    /// Section creation order; rebuilt by the `nrn_order` modifier.
    order: Vec<SectionId>,
    roots: Vec<SectionId>,
    soma: Soma,
}

impl Morphology {
    /// Creates a new, empty morphology.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the soma.
    #[must_use]
    pub fn soma(&self) -> &Soma {
        &self.soma
    }

    /// Returns the soma mutably.
    pub fn soma_mut(&mut self) -> &mut Soma {
        &mut self.soma
    }

    /// Number of sections.
    #[must_use]
    pub fn len(&self) -> usize {
        self.sections.len()
    }

    /// Whether the morphology has no sections.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    /// Root section ids, in creation order.
    #[must_use]
    pub fn root_sections(&self) -> &[SectionId] {
        &self.roots
    }

    /// Returns a reference to the section data, or an error if not found.
    ///
    /// # Errors
    ///
    /// Returns an error if `id` is not a section of this morphology.
    pub fn section(&self, id: SectionId) -> Result<&SectionData, BuilderError> {
        self.sections.get(id).ok_or(BuilderError::SectionNotFound)
    }

    /// Returns a mutable reference to the section data, or an error if not
    /// found.
    ///
    /// # Errors
    ///
    /// Returns an error if `id` is not a section of this morphology.
    pub fn section_mut(&mut self, id: SectionId) -> Result<&mut SectionData, BuilderError> {
        self.sections
            .get_mut(id)
            .ok_or(BuilderError::SectionNotFound)
    }

    /// Appends a root section, attached at the soma.
    pub fn append_root_section(
        &mut self,
        points: Vec<Point3>,
        diameters: Vec<f64>,
        section_type: SectionType,
    ) -> SectionId {
        let id = self.sections.insert(SectionData {
            section_type,
            points,
            diameters,
            parent: None,
            children: Vec::new(),
        });
        self.order.push(id);
        self.roots.push(id);
        id
    }

    /// Appends a section under `parent`.
    ///
    /// # Errors
    ///
    /// Returns an error if `parent` is not a section of this morphology.
    pub fn append_section(
        &mut self,
        parent: SectionId,
        points: Vec<Point3>,
        diameters: Vec<f64>,
        section_type: SectionType,
    ) -> Result<SectionId, BuilderError> {
        if !self.sections.contains_key(parent) {
            return Err(BuilderError::SectionNotFound);
        }
        let id = self.sections.insert(SectionData {
            section_type,
            points,
            diameters,
            parent: Some(parent),
            children: Vec::new(),
        });
        self.order.push(id);
        self.sections[parent].children.push(id);
        Ok(id)
    }

    /// Applies the post-processing switches in a fixed order: neuron
    /// ordering, soma collapse, duplicate removal, two-point reduction.
    pub fn apply_modifiers(&mut self, options: Options) {
        if options.nrn_order {
            self.sort_neuron_order();
        }
        if options.soma_sphere {
            self.collapse_soma_to_sphere();
        }
        if options.no_duplicates {
            self.remove_duplicate_fork_points();
        }
        if options.two_points_sections {
            self.reduce_to_two_points();
        }
    }

    /// Stable-sorts roots and child lists by SWC type code, then renumbers
    /// the creation order to the new depth-first traversal.
    fn sort_neuron_order(&mut self) {
        let sections = &self.sections;
        self.roots
            .sort_by_key(|&id| sections[id].section_type.to_swc());

        let ids = self.order.clone();
        for id in ids {
            let mut children = std::mem::take(&mut self.sections[id].children);
            children.sort_by_key(|&child| self.sections[child].section_type.to_swc());
            self.sections[id].children = children;
        }

        let mut order = Vec::with_capacity(self.order.len());
        let mut stack: Vec<SectionId> = self.roots.iter().rev().copied().collect();
        while let Some(id) = stack.pop() {
            order.push(id);
            stack.extend(self.sections[id].children.iter().rev());
        }
        self.order = order;
    }

    /// Replaces a multi-point soma with its centroid; the diameter becomes
    /// the arithmetic mean.
    #[allow(clippy::cast_precision_loss)]
    fn collapse_soma_to_sphere(&mut self) {
        if self.soma.points.len() < 2 {
            return;
        }
        let n = self.soma.points.len() as f64;
        let centroid = self.soma.points.iter().map(|p| p.coords).sum::<Vector3>() / n;
        let mean_diameter = self.soma.diameters.iter().sum::<f64>() / n;
        self.soma = Soma {
            kind: SomaKind::SinglePoint,
            points: vec![Point3::from(centroid)],
            diameters: vec![mean_diameter],
        };
    }

    /// Removes the head point of every child section that repeats its
    /// parent's last point. Creation order is a pre-order, so parents are
    /// visited before their children.
    fn remove_duplicate_fork_points(&mut self) {
        for index in 0..self.order.len() {
            let id = self.order[index];
            let Some(parent) = self.sections[id].parent else {
                continue;
            };
            let Some(parent_last) = self.sections[parent].points.last().copied() else {
                continue;
            };
            let section = &mut self.sections[id];
            if section.points.len() > 1 && section.points.first() == Some(&parent_last) {
                section.points.remove(0);
                section.diameters.remove(0);
            }
        }
    }

    /// Reduces every section to its first and last point.
    fn reduce_to_two_points(&mut self) {
        for (_, section) in &mut self.sections {
            if section.points.len() > 2 {
                let last_point = section.points[section.points.len() - 1];
                let last_diameter = section.diameters[section.diameters.len() - 1];
                section.points = vec![section.points[0], last_point];
                section.diameters = vec![section.diameters[0], last_diameter];
            }
        }
    }

    /// Builds the read-only properties value.
    ///
    /// Section indices follow creation order; the cell family and format
    /// version are placeholders for the reader to stamp.
    #[must_use]
    pub fn build_read_only(&self) -> Properties {
        let index_of: HashMap<SectionId, usize> = self
            .order
            .iter()
            .enumerate()
            .map(|(index, &id)| (id, index))
            .collect();

        let sections = self
            .order
            .iter()
            .map(|&id| {
                let data = &self.sections[id];
                SectionProperties {
                    section_type: data.section_type,
                    points: data.points.clone(),
                    diameters: data.diameters.clone(),
                    parent: data.parent.map(|parent| index_of[&parent]),
                    children: data.children.iter().map(|child| index_of[child]).collect(),
                }
            })
            .collect();

        Properties {
            cell_family: CellFamily::default(),
            version: FormatVersion::default(),
            soma: self.soma.clone(),
            sections,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn p(x: f64, y: f64, z: f64) -> Point3 {
        Point3::new(x, y, z)
    }

    fn axon_chain(morph: &mut Morphology) -> (SectionId, SectionId) {
        let root = morph.append_root_section(
            vec![p(0.0, 0.0, 0.0), p(1.0, 0.0, 0.0), p(2.0, 0.0, 0.0)],
            vec![2.0, 2.0, 2.0],
            SectionType::Axon,
        );
        let child = morph
            .append_section(
                root,
                vec![p(2.0, 0.0, 0.0), p(2.0, 1.0, 0.0)],
                vec![2.0, 1.0],
                SectionType::Axon,
            )
            .unwrap();
        (root, child)
    }

    #[test]
    fn append_links_parent_and_children() {
        let mut morph = Morphology::new();
        let (root, child) = axon_chain(&mut morph);

        assert_eq!(morph.len(), 2);
        assert_eq!(morph.root_sections(), &[root]);
        assert_eq!(morph.section(root).unwrap().children, vec![child]);
        assert_eq!(morph.section(child).unwrap().parent, Some(root));
    }

    #[test]
    fn append_to_dangling_handle_fails() {
        let mut morph = Morphology::new();
        let result = morph.append_section(
            SectionId::default(),
            vec![p(0.0, 0.0, 0.0)],
            vec![1.0],
            SectionType::Axon,
        );
        assert!(matches!(result, Err(BuilderError::SectionNotFound)));
    }

    #[test]
    fn read_only_view_uses_creation_order_indices() {
        let mut morph = Morphology::new();
        axon_chain(&mut morph);

        let properties = morph.build_read_only();
        assert_eq!(properties.sections.len(), 2);
        assert_eq!(properties.sections[0].parent, None);
        assert_eq!(properties.sections[0].children, vec![1]);
        assert_eq!(properties.sections[1].parent, Some(0));
        assert_eq!(properties.root_sections(), vec![0]);
    }

    #[test]
    fn two_points_sections_keeps_endpoints() {
        let mut morph = Morphology::new();
        let (root, _) = axon_chain(&mut morph);

        morph.apply_modifiers(Options {
            two_points_sections: true,
            ..Options::default()
        });

        let section = morph.section(root).unwrap();
        assert_eq!(section.points, vec![p(0.0, 0.0, 0.0), p(2.0, 0.0, 0.0)]);
        assert_eq!(section.diameters, vec![2.0, 2.0]);
    }

    #[test]
    fn no_duplicates_drops_repeated_fork_point() {
        let mut morph = Morphology::new();
        let (_, child) = axon_chain(&mut morph);

        morph.apply_modifiers(Options {
            no_duplicates: true,
            ..Options::default()
        });

        let section = morph.section(child).unwrap();
        assert_eq!(section.points, vec![p(2.0, 1.0, 0.0)]);
        assert_eq!(section.diameters, vec![1.0]);
    }

    #[test]
    fn soma_sphere_collapses_to_centroid() {
        let mut morph = Morphology::new();
        *morph.soma_mut() = Soma {
            kind: SomaKind::Cylinders,
            points: vec![p(0.0, 0.0, 0.0), p(2.0, 0.0, 0.0), p(4.0, 0.0, 0.0)],
            diameters: vec![1.0, 2.0, 3.0],
        };

        morph.apply_modifiers(Options {
            soma_sphere: true,
            ..Options::default()
        });

        assert_eq!(morph.soma().kind, SomaKind::SinglePoint);
        assert_eq!(morph.soma().points, vec![p(2.0, 0.0, 0.0)]);
        assert_eq!(morph.soma().diameters, vec![2.0]);
    }

    #[test]
    fn nrn_order_sorts_roots_by_type_code() {
        let mut morph = Morphology::new();
        let apical = morph.append_root_section(
            vec![p(0.0, 1.0, 0.0)],
            vec![1.0],
            SectionType::ApicalDendrite,
        );
        let axon =
            morph.append_root_section(vec![p(0.0, -1.0, 0.0)], vec![1.0], SectionType::Axon);

        morph.apply_modifiers(Options {
            nrn_order: true,
            ..Options::default()
        });

        assert_eq!(morph.root_sections(), &[axon, apical]);
        let properties = morph.build_read_only();
        assert_eq!(properties.sections[0].section_type, SectionType::Axon);
        assert_eq!(
            properties.sections[1].section_type,
            SectionType::ApicalDendrite
        );
    }
}
