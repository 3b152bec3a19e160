use self::Interpolated::*;

/// Outcome of looking up `x` in a sorted table.
#[derive(PartialEq, Debug, Clone, Copy)]
pub enum Interpolated {
    /// `x` lies within the table.
    Inside(f64),
    /// `x` lies outside the table; the end segment was extended.
    Outside(f64),
    Empty,
}

impl Interpolated {
    pub fn is_inside(&self) -> bool {
        matches!(*self, Inside(_))
    }

    pub fn is_outside(&self) -> bool {
        matches!(*self, Outside(_))
    }

    pub fn value(&self) -> Option<f64> {
        match *self {
            Inside(v) | Outside(v) => Some(v),
            Empty => None,
        }
    }
}

/// Linear interpolation of `ys` over the ascending grid `xs`. Both slices must
/// have the same length.
pub(crate) fn interpolate(x: f64, xs: &[f64], ys: &[f64]) -> Interpolated {
    let n = xs.len().min(ys.len());
    if n == 0 {
        return Empty;
    }
    if n == 1 {
        return if x == xs[0] { Inside(ys[0]) } else { Outside(ys[0]) };
    }

    let line = |i: usize, j: usize| (ys[j] - ys[i]) / (xs[j] - xs[i]) * (x - xs[i]) + ys[i];

    match xs[..n].binary_search_by(|v| v.total_cmp(&x)) {
        Ok(i) => Inside(ys[i]),
        Err(0) => Outside(line(0, 1)),
        Err(i) if i == n => Outside(line(n - 2, n - 1)),
        Err(i) => Inside(line(i - 1, i)),
    }
}
