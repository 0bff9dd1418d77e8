//! Headless element tree
//!
//! A minimal retained scene used as the animation target when no UI toolkit
//! is attached: elements carry the animatable visual properties and a
//! parent/child structure. Containers group other elements; plain elements
//! are leaves.

use crate::transition::Property;
use slotmap::{new_key_type, SlotMap};
use smallvec::SmallVec;

new_key_type! {
    /// Unique identifier for an element in a scene
    pub struct ElementId;
}

/// Animatable properties of an element
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct VisualProps {
    pub opacity: f32,
    pub translate_x: f32,
    pub translate_y: f32,
    /// Degrees
    pub rotation: f32,
}

impl Default for VisualProps {
    fn default() -> Self {
        Self {
            opacity: 1.0,
            translate_x: 0.0,
            translate_y: 0.0,
            rotation: 0.0,
        }
    }
}

impl VisualProps {
    pub fn get(&self, property: Property) -> f32 {
        match property {
            Property::Opacity => self.opacity,
            Property::TranslateX => self.translate_x,
            Property::TranslateY => self.translate_y,
            Property::Rotation => self.rotation,
        }
    }

    pub fn set(&mut self, property: Property, value: f32) {
        match property {
            Property::Opacity => self.opacity = value,
            Property::TranslateX => self.translate_x = value,
            Property::TranslateY => self.translate_y = value,
            Property::Rotation => self.rotation = value,
        }
    }
}

/// Whether an element can hold children
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ElementKind {
    Element,
    Container,
}

#[derive(Debug)]
struct Node {
    kind: ElementKind,
    parent: Option<ElementId>,
    children: SmallVec<[ElementId; 4]>,
    props: VisualProps,
    attached: bool,
}

/// Element tree holding visual state
#[derive(Debug, Default)]
pub struct Scene {
    nodes: SlotMap<ElementId, Node>,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a plain (leaf) element
    pub fn add_element(&mut self, parent: Option<ElementId>) -> ElementId {
        self.insert(ElementKind::Element, parent)
    }

    /// Add a container element
    pub fn add_container(&mut self, parent: Option<ElementId>) -> ElementId {
        self.insert(ElementKind::Container, parent)
    }

    fn insert(&mut self, kind: ElementKind, parent: Option<ElementId>) -> ElementId {
        let parent = parent.filter(|p| {
            let accepts = self
                .nodes
                .get(*p)
                .is_some_and(|node| node.kind == ElementKind::Container);
            if !accepts {
                tracing::warn!("element {:?} cannot hold children, adding as a root", p);
            }
            accepts
        });
        let attached = parent.map_or(true, |p| self.is_attached(p));

        let id = self.nodes.insert(Node {
            kind,
            parent,
            children: SmallVec::new(),
            props: VisualProps::default(),
            attached,
        });
        if let Some(node) = parent.and_then(|p| self.nodes.get_mut(p)) {
            node.children.push(id);
        }
        id
    }

    pub fn kind(&self, id: ElementId) -> Option<ElementKind> {
        self.nodes.get(id).map(|node| node.kind)
    }

    pub fn parent(&self, id: ElementId) -> Option<ElementId> {
        self.nodes.get(id).and_then(|node| node.parent)
    }

    pub fn children(&self, id: ElementId) -> &[ElementId] {
        self.nodes
            .get(id)
            .map(|node| node.children.as_slice())
            .unwrap_or(&[])
    }

    /// Whether the element exists and is still attached
    pub fn is_attached(&self, id: ElementId) -> bool {
        self.nodes.get(id).is_some_and(|node| node.attached)
    }

    pub fn props(&self, id: ElementId) -> Option<VisualProps> {
        self.nodes.get(id).map(|node| node.props)
    }

    /// Mutable visual state, only for attached elements
    pub fn props_mut(&mut self, id: ElementId) -> Option<&mut VisualProps> {
        self.nodes
            .get_mut(id)
            .filter(|node| node.attached)
            .map(|node| &mut node.props)
    }

    /// Detach an element and its whole subtree. Detached elements keep their
    /// last visual state but can no longer be animated.
    pub fn detach(&mut self, id: ElementId) {
        if let Some(parent) = self.parent(id) {
            if let Some(node) = self.nodes.get_mut(parent) {
                node.children.retain(|child| *child != id);
            }
        }

        let mut stack: SmallVec<[ElementId; 8]> = SmallVec::new();
        stack.push(id);
        while let Some(current) = stack.pop() {
            if let Some(node) = self.nodes.get_mut(current) {
                node.attached = false;
                stack.extend(node.children.iter().copied());
            }
        }
    }

    /// Remove an element and its subtree entirely
    pub fn remove(&mut self, id: ElementId) {
        self.detach(id);
        let mut stack: SmallVec<[ElementId; 8]> = SmallVec::new();
        stack.push(id);
        while let Some(current) = stack.pop() {
            if let Some(node) = self.nodes.remove(current) {
                stack.extend(node.children);
            }
        }
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tree_structure() {
        let mut scene = Scene::new();
        let root = scene.add_container(None);
        let a = scene.add_element(Some(root));
        let group = scene.add_container(Some(root));
        let b = scene.add_element(Some(group));

        assert_eq!(scene.children(root), &[a, group]);
        assert_eq!(scene.children(group), &[b]);
        assert_eq!(scene.parent(b), Some(group));
        assert_eq!(scene.kind(group), Some(ElementKind::Container));
        assert_eq!(scene.kind(a), Some(ElementKind::Element));
        assert_eq!(scene.len(), 4);
    }

    #[test]
    fn test_leaf_cannot_hold_children() {
        let mut scene = Scene::new();
        let leaf = scene.add_element(None);
        let orphan = scene.add_element(Some(leaf));

        assert!(scene.children(leaf).is_empty());
        assert_eq!(scene.parent(orphan), None);
    }

    #[test]
    fn test_detach_covers_subtree() {
        let mut scene = Scene::new();
        let root = scene.add_container(None);
        let group = scene.add_container(Some(root));
        let leaf = scene.add_element(Some(group));

        scene.detach(group);

        assert!(scene.is_attached(root));
        assert!(!scene.is_attached(group));
        assert!(!scene.is_attached(leaf));
        assert!(scene.children(root).is_empty());
        assert!(scene.props_mut(leaf).is_none());
        assert_eq!(scene.props(leaf), Some(VisualProps::default()));
    }

    #[test]
    fn test_remove_drops_subtree() {
        let mut scene = Scene::new();
        let root = scene.add_container(None);
        let leaf = scene.add_element(Some(root));

        scene.remove(root);

        assert!(scene.is_empty());
        assert_eq!(scene.props(leaf), None);
    }

    #[test]
    fn test_property_access() {
        let mut props = VisualProps::default();
        props.set(Property::TranslateY, 12.0);
        props.set(Property::Rotation, 30.0);
        assert_eq!(props.get(Property::TranslateY), 12.0);
        assert_eq!(props.get(Property::Rotation), 30.0);
        assert_eq!(props.get(Property::Opacity), 1.0);
    }
}
