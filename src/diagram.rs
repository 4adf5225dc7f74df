// Copyright 2025 Cowboy AI, LLC.

//! Diagrams: small vertex/arrow graphs
//!
//! A diagram stores its arrows in an `n × n` table of arrow lists, so
//! inserting or deleting a vertex renumbers the whole table. Diagrams here
//! describe a handful of forms or modules, which keeps that quadratic
//! storage cheap.
//!
//! - [`FormDiagram`] has form references as vertices; limit and colimit forms
//!   use it for their coordinates.
//! - [`MathDiagram`] has modules as vertices and module morphisms as arrows.

use std::collections::VecDeque;

use crate::algebra::{AlgebraError, Module, ModuleMorphism};
use crate::errors::{DenotatorError, DenotatorResult};
use crate::form::FormRef;

/// A directed multigraph with numbered vertices
#[derive(Debug, Clone)]
pub struct Diagram<V, A> {
    vertices: Vec<V>,
    arrows: Vec<Vec<Vec<A>>>,
}

/// Diagram over forms, backing limit and colimit coordinates
pub type FormDiagram = Diagram<FormRef, ModuleMorphism>;

/// Diagram over modules and module morphisms
pub type MathDiagram = Diagram<Module, ModuleMorphism>;

impl<V, A> Default for Diagram<V, A> {
    fn default() -> Self {
        Self { vertices: Vec::new(), arrows: Vec::new() }
    }
}

impl<V, A> Diagram<V, A> {
    /// Create an empty diagram
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a diagram with the given vertices and no arrows
    pub fn from_vertices(vertices: Vec<V>) -> Self {
        let n = vertices.len();
        let arrows = (0..n).map(|_| (0..n).map(|_| Vec::new()).collect()).collect();
        Self { vertices, arrows }
    }

    /// Number of vertices
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Vertex `index`, if present
    pub fn vertex(&self, index: usize) -> Option<&V> {
        self.vertices.get(index)
    }

    /// All vertices in index order
    pub fn vertices(&self) -> impl Iterator<Item = &V> {
        self.vertices.iter()
    }

    /// Append a vertex and return its index
    pub fn add_vertex(&mut self, vertex: V) -> usize {
        let index = self.vertices.len();
        self.insert_vertex(index, vertex);
        index
    }

    /// Insert a vertex at `index`, shifting later vertices (and their arrows) up
    pub fn insert_vertex(&mut self, index: usize, vertex: V) {
        let index = index.min(self.vertices.len());
        self.vertices.insert(index, vertex);
        for row in &mut self.arrows {
            row.insert(index, Vec::new());
        }
        let n = self.vertices.len();
        self.arrows.insert(index, (0..n).map(|_| Vec::new()).collect());
    }

    /// Remove vertex `index` together with every arrow touching it
    pub fn delete_vertex(&mut self, index: usize) -> Option<V> {
        if index >= self.vertices.len() {
            return None;
        }
        self.arrows.remove(index);
        for row in &mut self.arrows {
            row.remove(index);
        }
        Some(self.vertices.remove(index))
    }

    /// Add an arrow `from -> to`
    pub fn add_arrow(&mut self, from: usize, to: usize, arrow: A) -> DenotatorResult<()> {
        self.check_endpoint(from, 0)?;
        self.check_endpoint(to, 1)?;
        self.arrows[from][to].push(arrow);
        Ok(())
    }

    /// Remove the `k`-th arrow `from -> to`
    pub fn remove_arrow(&mut self, from: usize, to: usize, k: usize) -> Option<A> {
        let list = self.arrows.get_mut(from)?.get_mut(to)?;
        (k < list.len()).then(|| list.remove(k))
    }

    /// Arrows `from -> to` (empty when either endpoint is missing)
    pub fn arrows(&self, from: usize, to: usize) -> &[A] {
        self.arrows
            .get(from)
            .and_then(|row| row.get(to))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Total number of arrows
    pub fn arrow_count(&self) -> usize {
        self.arrows.iter().flatten().map(Vec::len).sum()
    }

    /// Every arrow with its endpoints
    pub fn all_arrows(&self) -> impl Iterator<Item = (usize, usize, &A)> {
        self.arrows.iter().enumerate().flat_map(|(from, row)| {
            row.iter()
                .enumerate()
                .flat_map(move |(to, list)| list.iter().map(move |a| (from, to, a)))
        })
    }

    /// Vertices reachable by one arrow from `from`
    pub fn successors(&self, from: usize) -> Vec<usize> {
        self.arrows
            .get(from)
            .map(|row| {
                row.iter()
                    .enumerate()
                    .filter(|(_, list)| !list.is_empty())
                    .map(|(to, _)| to)
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Vertices reachable from `start` (including `start`), breadth first
    pub fn reachable_from(&self, start: usize) -> Vec<usize> {
        if start >= self.vertices.len() {
            return Vec::new();
        }
        let mut seen = vec![false; self.vertices.len()];
        let mut order = Vec::new();
        let mut queue = VecDeque::from([start]);
        seen[start] = true;
        while let Some(v) = queue.pop_front() {
            order.push(v);
            for next in self.successors(v) {
                if !seen[next] {
                    seen[next] = true;
                    queue.push_back(next);
                }
            }
        }
        order
    }

    /// True when some vertex can reach itself through one or more arrows
    pub fn has_cycle(&self) -> bool {
        #[derive(Clone, Copy, PartialEq)]
        enum Mark {
            New,
            OnStack,
            Done,
        }

        fn visit<V, A>(d: &Diagram<V, A>, v: usize, marks: &mut [Mark]) -> bool {
            marks[v] = Mark::OnStack;
            for next in d.successors(v) {
                let mark = marks[next];
                match mark {
                    Mark::OnStack => return true,
                    Mark::New if visit(d, next, marks) => return true,
                    _ => {}
                }
            }
            marks[v] = Mark::Done;
            false
        }

        let mut marks = vec![Mark::New; self.vertices.len()];
        (0..self.vertices.len()).any(|v| marks[v] == Mark::New && visit(self, v, &mut marks))
    }

    fn check_endpoint(&self, index: usize, depth: usize) -> DenotatorResult<()> {
        if index >= self.vertices.len() {
            return Err(DenotatorError::PathOutOfRange {
                index,
                bound: self.vertices.len(),
                depth,
            });
        }
        Ok(())
    }
}

impl MathDiagram {
    /// Add a morphism arrow, checking it runs between the vertex modules
    pub fn add_morphism(
        &mut self,
        from: usize,
        to: usize,
        morphism: ModuleMorphism,
    ) -> DenotatorResult<()> {
        let (Some(source), Some(target)) = (self.vertex(from).copied(), self.vertex(to).copied())
        else {
            return Err(DenotatorError::PathOutOfRange {
                index: from.max(to),
                bound: self.vertex_count(),
                depth: 0,
            });
        };
        if morphism.domain() != source {
            return Err(AlgebraError::DomainMismatch { expected: source, actual: morphism.domain() }.into());
        }
        if morphism.codomain() != target {
            return Err(DenotatorError::ModuleMismatch { expected: target, actual: morphism.codomain() });
        }
        self.add_arrow(from, to, morphism)
    }

    /// Compose the first arrow of each step along a vertex path
    pub fn compose_path(&self, path: &[usize]) -> DenotatorResult<ModuleMorphism> {
        let Some(&first) = path.first() else {
            return Err(DenotatorError::InvalidPath { depth: 0, reason: "empty path".into() });
        };
        let start = *self.vertex(first).ok_or(DenotatorError::PathOutOfRange {
            index: first,
            bound: self.vertex_count(),
            depth: 0,
        })?;
        let mut composite = ModuleMorphism::identity(start);
        for (depth, step) in path.windows(2).enumerate() {
            let arrow = self.arrows(step[0], step[1]).first().ok_or_else(|| {
                DenotatorError::InvalidPath {
                    depth: depth + 1,
                    reason: format!("no arrow {} -> {}", step[0], step[1]),
                }
            })?;
            composite = arrow.compose(&composite)?;
        }
        Ok(composite)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algebra::{ModuleElement, Scalar};

    fn chain() -> Diagram<&'static str, u8> {
        let mut d = Diagram::from_vertices(vec!["a", "b", "c"]);
        d.add_arrow(0, 1, 1).unwrap();
        d.add_arrow(1, 2, 2).unwrap();
        d
    }

    #[test]
    fn test_arrows_follow_vertex_renumbering() {
        let mut d = chain();
        d.insert_vertex(0, "z");
        assert_eq!(d.vertex(1), Some(&"a"));
        assert_eq!(d.arrows(1, 2), &[1]);
        assert_eq!(d.arrows(2, 3), &[2]);

        assert_eq!(d.delete_vertex(2), Some("b"));
        assert_eq!(d.vertex_count(), 3);
        assert_eq!(d.arrow_count(), 0);
    }

    #[test]
    fn test_arrow_endpoints_are_checked() {
        let mut d = chain();
        assert!(d.add_arrow(0, 9, 3).is_err());
        assert_eq!(d.remove_arrow(0, 1, 0), Some(1));
        assert_eq!(d.remove_arrow(0, 1, 0), None);
    }

    #[test]
    fn test_reachability_and_cycles() {
        let mut d = chain();
        assert_eq!(d.reachable_from(0), vec![0, 1, 2]);
        assert_eq!(d.reachable_from(2), vec![2]);
        assert!(!d.has_cycle());
        d.add_arrow(2, 0, 3).unwrap();
        assert!(d.has_cycle());
        assert_eq!(d.reachable_from(2), vec![2, 0, 1]);
    }

    #[test]
    fn test_math_diagram_composes_paths() {
        let mut d = MathDiagram::from_vertices(vec![Module::integers(1), Module::integers(1), Module::reals(1)]);
        let double = ModuleMorphism::scaling(Module::integers(1), Scalar::Integer(2)).unwrap();
        let embed = ModuleMorphism::embedding(Module::integers(1), Module::reals(1)).unwrap();
        d.add_morphism(0, 1, double).unwrap();
        d.add_morphism(1, 2, embed).unwrap();
        assert!(d
            .add_morphism(0, 2, ModuleMorphism::identity(Module::integers(1)))
            .is_err());

        let path = d.compose_path(&[0, 1, 2]).unwrap();
        assert_eq!(path.apply(&ModuleElement::integer(3)).unwrap(), ModuleElement::real(6.0));
        assert!(d.compose_path(&[2, 0]).is_err());
    }
}
