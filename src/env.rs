use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;
use crate::object::Object;

/// Shared handle to a scope. Closures and call frames hold these, so a scope
/// lives as long as the longest-lived of them.
pub type Env = Rc<RefCell<Environment>>;

#[derive(Debug, Default)]
pub struct Environment {
    store: HashMap<String, Object>,
    outer: Option<Env>,
}

impl Environment {
    pub fn new() -> Env {
        Rc::new(RefCell::new(Environment::default()))
    }

    pub fn new_enclosed(outer: Env) -> Env {
        Rc::new(RefCell::new(Environment {
            store: HashMap::new(),
            outer: Some(outer),
        }))
    }

    pub fn get(&self, name: &str) -> Option<Object> {
        match self.store.get(name) {
            Some(val) => Some(val.clone()),
            None => match &self.outer {
                Some(outer) => outer.borrow().get(name),
                None => None,
            }
        }
    }

    /// Binds `name` in this scope, shadowing any outer binding.
    pub fn set(&mut self, name: impl Into<String>, val: Object) {
        self.store.insert(name.into(), val);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_walks_outward() {
        let outer = Environment::new();
        outer.borrow_mut().set("a", Object::Integer(1));

        let inner = Environment::new_enclosed(Rc::clone(&outer));
        inner.borrow_mut().set("b", Object::Integer(2));

        assert_eq!(inner.borrow().get("a").map(|o| o.inspect()), Some("1".to_string()));
        assert_eq!(inner.borrow().get("b").map(|o| o.inspect()), Some("2".to_string()));
        assert!(outer.borrow().get("b").is_none());
        assert!(inner.borrow().get("c").is_none());
    }

    #[test]
    fn test_inner_binding_shadows_outer() {
        let outer = Environment::new();
        outer.borrow_mut().set("x", Object::Integer(1));
        let inner = Environment::new_enclosed(Rc::clone(&outer));
        inner.borrow_mut().set("x", Object::Integer(2));

        assert_eq!(inner.borrow().get("x").map(|o| o.inspect()), Some("2".to_string()));
        assert_eq!(outer.borrow().get("x").map(|o| o.inspect()), Some("1".to_string()));
    }

    #[test]
    fn test_outer_mutation_is_visible() {
        let outer = Environment::new();
        let inner = Environment::new_enclosed(Rc::clone(&outer));
        outer.borrow_mut().set("late", Object::Integer(7));

        assert_eq!(inner.borrow().get("late").map(|o| o.inspect()), Some("7".to_string()));
    }
}
