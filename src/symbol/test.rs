use super::*;

#[test]
fn test_same_text_same_symbol() {
    let a = Symbol::from("Player");
    let b = Symbol::from(String::from("Player"));
    assert_eq!(a, b);
    assert_eq!(a.as_str().as_ptr(), b.as_str().as_ptr());
    assert_ne!(a, Symbol::from("player"));
}

#[test]
fn test_orders_by_text() {
    let mut keys = vec![Symbol::from("b"), Symbol::from("c"), Symbol::from("a")];
    keys.sort();
    let names: Vec<_> = keys.iter().map(|k| k.as_str()).collect();
    assert_eq!(names, vec!["a", "b", "c"]);
}

static PATROL_ROUTE: Lazy<Symbol> = Lazy::new(|| "PatrolRoute".into());

#[test]
fn test_cached_key_reuses_interned_text() {
    let built = Symbol::from(format!("Patrol{}", "Route"));
    assert_eq!(*PATROL_ROUTE, built);
    assert_eq!(PATROL_ROUTE.as_str().as_ptr(), built.as_str().as_ptr());
}
