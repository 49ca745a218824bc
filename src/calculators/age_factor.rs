//! Piecewise-linear age factor tables used by the California pension formulas

/// Benefit factor (percent per year of service) anchored at whole ages
#[derive(Debug, Clone, Copy)]
pub struct AgeFactorTable {
    points: &'static [(u32, f64)],
}

impl AgeFactorTable {
    pub const fn new(points: &'static [(u32, f64)]) -> Self {
        Self { points }
    }

    pub fn minimum_age(&self) -> u32 {
        self.points.first().map(|(age, _)| *age).unwrap_or(0)
    }

    /// Factor at a fractional age; None below the minimum age
    ///
    /// Ages past the last point keep the last factor.
    pub fn factor(&self, age: f64) -> Option<f64> {
        let &(first_age, _) = self.points.first()?;
        let &(last_age, last) = self.points.last()?;

        if age < first_age as f64 {
            return None;
        }
        if age >= last_age as f64 {
            return Some(last);
        }
        if let Some(&(_, exact)) = self.points.iter().find(|(a, _)| *a as f64 == age) {
            return Some(exact);
        }

        self.points.windows(2).find_map(|pair| {
            let (a0, f0) = pair[0];
            let (a1, f1) = pair[1];
            if age >= a0 as f64 && age <= a1 as f64 {
                let t = (age - a0 as f64) / (a1 - a0) as f64;
                Some(f0 + t * (f1 - f0))
            } else {
                None
            }
        })
    }
}
