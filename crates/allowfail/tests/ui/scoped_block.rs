use allowfail::{AllowFail, BoxError};

fn main() -> Result<(), allowfail::ReportError> {
    let mut reached = 0;

    AllowFail::new("step {}").param(1).protect(|| {
        let n: u32 = "one".parse()?;
        reached += n;
        Ok::<_, BoxError>(())
    })?;

    reached += 1;
    assert_eq!(reached, 1);
    Ok(())
}
