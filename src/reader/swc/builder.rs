use std::collections::HashMap;

use super::sample::RawSample;
use crate::error::{BuilderError, MissingParentError, RawDataError, Result, SomaError};
use crate::math::{Point3, EPSILON};
use crate::morphology::{Morphology, Options, Properties, SectionId, SectionType, Soma, SomaKind};
use crate::warning::{Warning, WarningHandler};

/// One validated SWC record.
#[derive(Debug, Clone, Copy)]
struct Sample {
    id: u32,
    section_type: SectionType,
    point: Point3,
    diameter: f64,
    parent: Option<u32>,
    line: u32,
}

/// A pending chain-collapse walk, queued on the assembly stack.
struct ChainJob {
    id: u32,
    /// Declared id of the parent chain's last sample; `None` for a neurite
    /// root with no parent.
    parent: Option<u32>,
    start_point: Point3,
    start_diameter: f64,
    is_root: bool,
}

/// Builds a morphology from the flat sample list.
///
/// Validation runs in two sub-passes over the list (index first, check
/// references second), so parents may appear after their children.
pub(crate) struct SwcBuilder<'a> {
    samples_by_id: HashMap<u32, Sample>,
    children: HashMap<u32, Vec<u32>>,
    morph: Morphology,
    handler: &'a mut dyn WarningHandler,
}

impl<'a> SwcBuilder<'a> {
    pub(crate) fn new(handler: &'a mut dyn WarningHandler) -> Self {
        Self {
            samples_by_id: HashMap::new(),
            children: HashMap::new(),
            morph: Morphology::new(),
            handler,
        }
    }

    pub(crate) fn build_properties(
        mut self,
        raw_samples: Vec<RawSample>,
        options: Options,
    ) -> Result<Properties> {
        let (soma_samples, root_samples) = self.validate_and_index(&raw_samples)?;
        self.build_soma(&soma_samples)?;
        self.assemble_forest(&root_samples)?;
        self.morph.apply_modifiers(options);
        Ok(self.morph.build_read_only())
    }

    /// Per-sample checks plus index construction, then a second pass that
    /// resolves parent references once every sample is known.
    fn validate_and_index(
        &mut self,
        raw_samples: &[RawSample],
    ) -> Result<(Vec<Sample>, Vec<Sample>)> {
        let mut soma_samples = Vec::new();
        let mut root_samples = Vec::new();

        for raw in raw_samples {
            if raw.diameter < EPSILON {
                self.handler.warn(Warning::ZeroDiameter {
                    id: raw.id,
                    line: raw.line,
                });
            }
            if raw.parent == Some(raw.id) {
                return Err(RawDataError::SelfParent {
                    id: raw.id,
                    line: raw.line,
                }
                .into());
            }
            let Some(section_type) = SectionType::from_swc(raw.raw_type) else {
                return Err(RawDataError::UnsupportedSectionType {
                    raw: raw.raw_type,
                    line: raw.line,
                }
                .into());
            };
            if raw.parent.is_none() && !section_type.is_soma() {
                self.handler.warn(Warning::DisconnectedNeurite {
                    id: raw.id,
                    line: raw.line,
                });
            }

            let sample = Sample {
                id: raw.id,
                section_type,
                point: raw.point,
                diameter: raw.diameter,
                parent: raw.parent,
                line: raw.line,
            };

            if section_type.is_soma() {
                soma_samples.push(sample);
            }
            if sample.parent.is_none() || section_type.is_soma() {
                root_samples.push(sample);
            }

            if let Some(previous) = self.samples_by_id.insert(sample.id, sample) {
                return Err(RawDataError::RepeatedId {
                    id: sample.id,
                    line: sample.line,
                    first_line: previous.line,
                }
                .into());
            }
            if let Some(parent) = sample.parent {
                self.children.entry(parent).or_default().push(sample.id);
            }
        }

        // Parents may be declared after their children, so dangling
        // references can only be detected once the whole list is indexed.
        for raw in raw_samples {
            if let Some(parent) = raw.parent {
                if !self.samples_by_id.contains_key(&parent) {
                    return Err(MissingParentError {
                        id: raw.id,
                        parent,
                        line: raw.line,
                    }
                    .into());
                }
            }
        }

        Ok((soma_samples, root_samples))
    }

    fn parent_sample(&self, sample: &Sample, parent: u32) -> Result<&Sample> {
        self.samples_by_id.get(&parent).ok_or_else(|| {
            MissingParentError {
                id: sample.id,
                parent,
                line: sample.line,
            }
            .into()
        })
    }

    /// Selects the soma shape from the soma samples, in source order.
    fn build_soma(&mut self, soma_samples: &[Sample]) -> Result<()> {
        match soma_samples {
            [] => {
                self.morph.soma_mut().kind = SomaKind::Undefined;
            }
            [sample] => {
                if let Some(parent) = sample.parent {
                    if !self.parent_sample(sample, parent)?.section_type.is_soma() {
                        return Err(SomaError::NeuriteParent {
                            id: sample.id,
                            line: sample.line,
                        }
                        .into());
                    }
                }
                *self.morph.soma_mut() = Soma {
                    kind: SomaKind::SinglePoint,
                    points: vec![sample.point],
                    diameters: vec![sample.diameter],
                };
            }
            [center, child1, child2]
                if child1.parent == Some(center.id) && child2.parent == Some(center.id) =>
            {
                *self.morph.soma_mut() = Soma {
                    kind: SomaKind::NeuromorphoThreePointCylinders,
                    points: vec![center.point, child1.point, child2.point],
                    diameters: vec![center.diameter, child1.diameter, child2.diameter],
                };
                self.check_neuromorpho_soma(center, child1, child2);
            }
            _ => self.build_cylinders_soma(soma_samples)?,
        }
        Ok(())
    }

    /// A "normal" SWC soma: any number of soma samples read as stacked
    /// cylinders, rooted at a single parentless sample.
    fn build_cylinders_soma(&mut self, soma_samples: &[Sample]) -> Result<()> {
        let mut points = Vec::with_capacity(soma_samples.len());
        let mut diameters = Vec::with_capacity(soma_samples.len());

        let mut orphan_count = 0;
        for sample in soma_samples {
            match sample.parent {
                None => orphan_count += 1,
                Some(parent) => {
                    if !self.parent_sample(sample, parent)?.section_type.is_soma() {
                        return Err(SomaError::NeuriteParent {
                            id: sample.id,
                            line: sample.line,
                        }
                        .into());
                    }
                }
            }

            if let Some(children) = self.children.get(&sample.id) {
                let soma_children = children
                    .iter()
                    .filter(|child| {
                        self.samples_by_id
                            .get(child)
                            .is_some_and(|s| s.section_type.is_soma())
                    })
                    .count();
                if soma_children > 1 {
                    return Err(SomaError::Bifurcation {
                        id: sample.id,
                        line: sample.line,
                    }
                    .into());
                }
            }

            points.push(sample.point);
            diameters.push(sample.diameter);
        }

        if orphan_count > 1 {
            return Err(SomaError::MultipleSomata.into());
        }

        *self.morph.soma_mut() = Soma {
            kind: SomaKind::Cylinders,
            points,
            diameters,
        };
        Ok(())
    }

    /// Warns when a three-point soma is coincident with its center in x, z
    /// and diameter but off the canonical neuromorpho arrangement, which
    /// places the children exactly at y - r and y + r.
    #[allow(clippy::float_cmp)]
    fn check_neuromorpho_soma(&mut self, center: &Sample, child1: &Sample, child2: &Sample) {
        let x = center.point.x;
        let y = center.point.y;
        let z = center.point.z;
        let d = center.diameter;
        let r = d / 2.0;

        let canonical = child1.point.x == x
            && child2.point.x == x
            && child1.point.y == y - r
            && child2.point.y == y + r
            && child1.point.z == z
            && child2.point.z == z
            && child1.diameter == d
            && child2.diameter == d;
        let coincident = (child1.diameter - d).abs() < EPSILON
            && (child2.diameter - d).abs() < EPSILON
            && (child1.point.x - x).abs() < EPSILON
            && (child2.point.x - x).abs() < EPSILON
            && (child1.point.z - z).abs() < EPSILON
            && (child2.point.z - z).abs() < EPSILON;

        if !canonical && coincident {
            self.handler.warn(Warning::SomaNonConform {
                center_id: center.id,
                line: center.line,
            });
        }
    }

    fn sample(&self, id: u32) -> Result<Sample> {
        self.samples_by_id
            .get(&id)
            .copied()
            .ok_or_else(|| BuilderError::SectionNotFound.into())
    }

    /// Walks out from the soma and from orphan neurite roots, emitting
    /// sections into the morphology.
    fn assemble_forest(&mut self, root_samples: &[Sample]) -> Result<()> {
        let mut declared_to_section: HashMap<u32, SectionId> = HashMap::new();

        for root in root_samples {
            let Some(children) = self.children.get(&root.id).cloned() else {
                continue;
            };

            // neuromorpho convention: every arbor hangs off sample 1
            if self.morph.soma().kind == SomaKind::NeuromorphoThreePointCylinders
                && root.section_type.is_soma()
                && root.id != 1
            {
                self.handler.warn(Warning::WrongRootPoint {
                    id: root.id,
                    line: root.line,
                });
            }

            let soma_start_point = self.morph.soma().points.first().copied();
            let soma_start_diameter = self.morph.soma().diameters.first().copied();

            for child_id in children {
                if self.sample(child_id)?.section_type.is_soma() {
                    // the soma consumed those samples
                    continue;
                }
                if root.section_type.is_soma() {
                    self.assemble_subtree(
                        ChainJob {
                            id: child_id,
                            parent: Some(root.id),
                            start_point: soma_start_point.unwrap_or(root.point),
                            start_diameter: soma_start_diameter.unwrap_or(root.diameter),
                            is_root: true,
                        },
                        &mut declared_to_section,
                    )?;
                } else {
                    // a neurite root handles its whole subtree in one walk
                    self.assemble_subtree(
                        ChainJob {
                            id: root.id,
                            parent: None,
                            start_point: root.point,
                            start_diameter: root.diameter,
                            is_root: true,
                        },
                        &mut declared_to_section,
                    )?;
                    break;
                }
            }
        }
        Ok(())
    }

    /// Collapses maximal same-type unbranched chains into sections,
    /// walking the subtree with an explicit stack so depth is bounded by
    /// the branch count rather than the sample count.
    fn assemble_subtree(
        &mut self,
        job: ChainJob,
        declared_to_section: &mut HashMap<u32, SectionId>,
    ) -> Result<()> {
        let mut jobs = vec![job];

        while let Some(job) = jobs.pop() {
            let mut id = job.id;
            let mut sample = self.sample(id)?;

            let mut points = Vec::new();
            let mut diameters = Vec::new();

            // the duplicated fork point carries geometric continuity from
            // the parent section's last point
            if !job.is_root && sample.point != job.start_point {
                points.push(job.start_point);
                diameters.push(job.start_diameter);
            }

            // absorb unbranched same-type samples into a single section
            loop {
                let children = self.children.get(&id).map_or(&[][..], Vec::as_slice);
                if children.len() != 1 {
                    break;
                }
                let child_sample = self.sample(children[0])?;
                if child_sample.section_type != sample.section_type {
                    break;
                }
                points.push(sample.point);
                diameters.push(sample.diameter);
                id = child_sample.id;
                sample = child_sample;
            }
            points.push(sample.point);
            diameters.push(sample.diameter);

            let last_point = points[points.len() - 1];
            let last_diameter = diameters[diameters.len() - 1];

            let section = if job.is_root {
                self.morph
                    .append_root_section(points, diameters, sample.section_type)
            } else {
                let parent_section = job
                    .parent
                    .and_then(|declared| declared_to_section.get(&declared).copied())
                    .ok_or(BuilderError::SectionNotFound)?;
                self.morph
                    .append_section(parent_section, points, diameters, sample.section_type)?
            };
            declared_to_section.insert(id, section);

            // branch out; pushing in reverse keeps source sibling order
            // under the depth-first pop
            if let Some(children) = self.children.get(&id) {
                for &child in children.iter().rev() {
                    jobs.push(ChainJob {
                        id: child,
                        parent: Some(id),
                        start_point: last_point,
                        start_diameter: last_diameter,
                        is_root: false,
                    });
                }
            }
        }
        Ok(())
    }
}
