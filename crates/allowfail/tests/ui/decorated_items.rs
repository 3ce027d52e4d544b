use allowfail::{DynError, Outcome, allow_fail};

fn quiet(_label: &str, _err: &DynError) {}

/// Doc comments and attributes survive the rewrite.
#[allow_fail("checked add {} {}", a, b, on_error = quiet)]
#[inline]
pub fn checked_add(a: u8, b: u8) -> Result<u8, &'static str> {
    a.checked_add(b).ok_or("overflow")
}

#[allow_fail("plain")]
fn plain() -> Vec<u8> {
    vec![1, 2, 3]
}

pub struct Store;

impl Store {
    #[allow_fail("store get {}", key, on_error = quiet)]
    pub fn get(&self, key: &str) -> Result<String, std::fmt::Error> {
        Ok(key.to_uppercase())
    }
}

fn main() {
    let sum: Outcome<u8> = checked_add(200, 100);
    assert!(sum.is_failed());
    assert_eq!(checked_add(1, 2).ok(), Some(3));
    assert_eq!(plain().ok(), Some(vec![1, 2, 3]));
    assert_eq!(Store.get("k").ok(), Some("K".to_string()));
}
