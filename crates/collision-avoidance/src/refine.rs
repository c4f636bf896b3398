//! Within-event refinement: locates the time of closest approach by
//! derivative-free 1-D minimization of the inter-satellite distance over
//! the event's bracket, then reports miss distance and relative speed.

use std::cell::RefCell;
use std::collections::HashMap;

use chrono::Duration;
use orbital_mechanics::{Propagator, Pv};

use crate::domain::{Conjunction, Event};

/// Absolute time tolerance for the minimizer, per spec.
const ABS_TOL_S: f64 = 0.1;
/// Cap on function evaluations so a pathological event can't loop forever.
const MAX_EVALS: usize = 100;

/// Minimize `d(t) = ||pA(t) - pB(t)||` over `[t_min - step, t_max + step]`
/// and return the refined conjunction, or `None` if the event's pair has
/// no cached propagator, or the anchor sample itself fails to propagate.
pub fn refine(
    event: &Event,
    propagators: &HashMap<u32, Propagator>,
    step_s: f64,
) -> Option<Conjunction> {
    let pair = event.pair;
    let prop_a = propagators.get(&pair.cat_id_a)?;
    let prop_b = propagators.get(&pair.cat_id_b)?;

    let bracket_lo = event.t_min() - Duration::milliseconds((step_s * 1000.0).round() as i64);
    let bracket_hi = event.t_max() + Duration::milliseconds((step_s * 1000.0).round() as i64);
    let span_s = (bracket_hi - bracket_lo).num_milliseconds() as f64 / 1000.0;

    let any_failure = RefCell::new(false);
    // Every probe's (pa, pb) is cached here so the minimizer's own final
    // evaluation can be reused for relative velocity instead of a
    // redundant propagation at the settled TCA.
    let pv_cache: RefCell<HashMap<i64, (Pv, Pv)>> = RefCell::new(HashMap::new());
    let eval = |offset_s: f64| -> f64 {
        let offset_ms = (offset_s * 1000.0).round() as i64;
        let t = bracket_lo + Duration::milliseconds(offset_ms);
        match (prop_a.pv(t), prop_b.pv(t)) {
            (Ok(pa), Ok(pb)) => {
                let d = pa.distance_km(&pb);
                pv_cache.borrow_mut().insert(offset_ms, (pa, pb));
                d
            }
            _ => {
                *any_failure.borrow_mut() = true;
                f64::INFINITY
            }
        }
    };

    let (offset_star, miss_km) = fminbound(eval, 0.0, span_s.max(0.0), ABS_TOL_S, MAX_EVALS);

    if *any_failure.borrow() {
        tracing::warn!(
            cat_id_a = pair.cat_id_a,
            cat_id_b = pair.cat_id_b,
            "propagation failure during event refinement"
        );
    }

    if !miss_km.is_finite() {
        return None;
    }

    let offset_star_ms = (offset_star * 1000.0).round() as i64;
    let tca = bracket_lo + Duration::milliseconds(offset_star_ms);

    let (pa, pb) = *pv_cache.borrow().get(&offset_star_ms)?;
    let rel_speed_m_s = pa.relative_speed_m_s(&pb);

    Some(Conjunction {
        id: None,
        cat_id_a: pair.cat_id_a,
        cat_id_b: pair.cat_id_b,
        miss_km,
        tca,
        rel_speed_m_s,
    })
}

/// Brent's bounded scalar minimizer: parabolic interpolation when a
/// parabola fit through the three best points is well-conditioned, golden
/// section otherwise. Classic formulation (Forsythe/Malcolm/Moler `fmin`,
/// as used by e.g. `scipy.optimize.minimize_scalar(method="bounded")`),
/// adapted to take an absolute tolerance and an evaluation cap directly
/// instead of a relative machine-epsilon tolerance.
fn fminbound(f: impl Fn(f64) -> f64, lo: f64, hi: f64, abs_tol: f64, max_evals: usize) -> (f64, f64) {
    const GOLDEN: f64 = 0.381_966_011_250_105_1;

    let (mut a, mut b) = (lo, hi);
    let mut x = a + GOLDEN * (b - a);
    let (mut w, mut v) = (x, x);
    let mut fx = f(x);
    let (mut fw, mut fv) = (fx, fx);
    let mut d = 0.0_f64;
    let mut e = 0.0_f64;
    let mut evals = 1usize;

    loop {
        let m = 0.5 * (a + b);
        let tol1 = abs_tol;
        let tol2 = 2.0 * tol1;

        if (x - m).abs() <= tol2 - 0.5 * (b - a) || evals >= max_evals {
            break;
        }

        let mut use_golden = true;
        if e.abs() > tol1 {
            let r = (x - w) * (fx - fv);
            let mut q = (x - v) * (fx - fw);
            let mut p = (x - v) * q - (x - w) * r;
            q = 2.0 * (q - r);
            if q > 0.0 {
                p = -p;
            }
            q = q.abs();
            let e_prev = e;
            e = d;

            if p.abs() < (0.5 * q * e_prev).abs() && p > q * (a - x) && p < q * (b - x) {
                d = p / q;
                let u = x + d;
                if (u - a) < tol2 || (b - u) < tol2 {
                    d = if m >= x { tol1 } else { -tol1 };
                }
                use_golden = false;
            }
        }

        if use_golden {
            e = if x >= m { a - x } else { b - x };
            d = GOLDEN * e;
        }

        let u = if d.abs() >= tol1 { x + d } else { x + tol1.copysign(d) };
        let fu = f(u);
        evals += 1;

        if fu <= fx {
            if u >= x {
                a = x;
            } else {
                b = x;
            }
            v = w;
            fv = fw;
            w = x;
            fw = fx;
            x = u;
            fx = fu;
        } else {
            if u < x {
                a = u;
            } else {
                b = u;
            }
            if fu <= fw || w == x {
                v = w;
                fv = fw;
                w = u;
                fw = fu;
            } else if fu <= fv || v == x || v == w {
                v = u;
                fv = fu;
            }
        }
    }

    (x, fx)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fminbound_locates_minimum_of_a_parabola() {
        let (x, fx) = fminbound(|t| (t - 12.345).powi(2), 0.0, 50.0, 0.1, 100);
        assert!((x - 12.345).abs() < 0.2, "x={x}");
        assert!(fx < 0.05);
    }

    #[test]
    fn fminbound_respects_bounds() {
        let (x, _) = fminbound(|t| (t - 1000.0).powi(2), 0.0, 50.0, 0.1, 100);
        assert!((0.0..=50.0).contains(&x));
    }
}
