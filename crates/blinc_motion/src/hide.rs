//! Instant hiding of a container's descendants

use crate::driver::{AnimationDriver, Structure};
use crate::error::Result;
use crate::scene::ElementId;
use crate::transition::{Property, PropertyDelta};
use smallvec::SmallVec;

/// Set opacity to zero on every plain element below `root`.
///
/// Containers are descended into but keep their own opacity. The walk is
/// best effort: elements that cannot be read or updated are skipped. Only an
/// unavailable `root` is an error. Visiting order is unspecified.
///
/// Returns the number of elements hidden.
pub fn hide_children(driver: &dyn AnimationDriver, root: ElementId) -> Result<usize> {
    let mut pending: SmallVec<[ElementId; 16]> = match driver.structure(root)? {
        Structure::Container(children) => children.into_iter().collect(),
        Structure::Leaf => {
            tracing::trace!("{:?} has no children to hide", root);
            return Ok(0);
        }
    };

    let transparent = [PropertyDelta::to(Property::Opacity, 0.0)];
    let mut hidden = 0;

    while let Some(element) = pending.pop() {
        match driver.structure(element) {
            Ok(Structure::Container(children)) => pending.extend(children),
            Ok(Structure::Leaf) => match driver.apply(element, &transparent) {
                Ok(()) => hidden += 1,
                Err(err) => tracing::warn!("skipping {:?} while hiding: {}", element, err),
            },
            Err(err) => tracing::warn!("skipping {:?} while hiding: {}", element, err),
        }
    }

    tracing::debug!("hid {} elements below {:?}", hidden, root);
    Ok(hidden)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::VirtualClock;
    use crate::error::MotionError;
    use crate::scene::Scene;
    use crate::scheduler::SceneDriver;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn driver(scene: &Rc<RefCell<Scene>>) -> SceneDriver {
        SceneDriver::new(scene.clone(), Rc::new(VirtualClock::new()), 16)
    }

    #[test]
    fn test_hides_nested_leaves_only() {
        let scene = Rc::new(RefCell::new(Scene::new()));
        let (root, group, empty, leaves) = {
            let mut s = scene.borrow_mut();
            let root = s.add_container(None);
            let a = s.add_element(Some(root));
            let group = s.add_container(Some(root));
            let b = s.add_element(Some(group));
            let c = s.add_element(Some(group));
            let empty = s.add_container(Some(root));
            (root, group, empty, [a, b, c])
        };

        let hidden = hide_children(&driver(&scene), root).unwrap();

        assert_eq!(hidden, 3);
        let s = scene.borrow();
        for leaf in leaves {
            assert_eq!(s.props(leaf).unwrap().opacity, 0.0);
        }
        for container in [root, group, empty] {
            assert_eq!(s.props(container).unwrap().opacity, 1.0);
        }
    }

    #[test]
    fn test_leaf_root_hides_nothing() {
        let scene = Rc::new(RefCell::new(Scene::new()));
        let leaf = scene.borrow_mut().add_element(None);

        assert_eq!(hide_children(&driver(&scene), leaf), Ok(0));
        assert_eq!(scene.borrow().props(leaf).unwrap().opacity, 1.0);
    }

    #[test]
    fn test_unavailable_root_is_an_error() {
        let scene = Rc::new(RefCell::new(Scene::new()));
        let root = scene.borrow_mut().add_container(None);
        scene.borrow_mut().detach(root);

        assert_eq!(
            hide_children(&driver(&scene), root),
            Err(MotionError::TargetUnavailable(root))
        );
    }
}
