//! The built-in `math.*` table.
//!
//! Angles are in degrees throughout: `sin`/`cos` take degrees and the inverse
//! functions return degrees. Every function takes and returns plain numbers;
//! non-numeric arguments are coerced before the call.

use std::f64::consts::PI;

/// Source of uniformly distributed numbers in `[0, 1)` for the random
/// built-ins. The engine supplies a seedable generator per evaluation.
pub trait RandomSource {
    fn next_f64(&mut self) -> f64;
}

/// Upper bound on the number of dice rolled by one `die_roll*` call.
pub const MAX_DICE: u32 = 1024;

/// Named constants of the `math` scope.
pub fn math_constant(name: &str) -> Option<f64> {
    match name {
        "pi" => Some(PI),
        _ => None,
    }
}

/// Built-in math functions.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum MathFn {
    Abs,
    Acos,
    Asin,
    Atan,
    Atan2,
    Ceil,
    Clamp,
    Cos,
    DieRoll,
    DieRollInteger,
    Exp,
    Floor,
    HermiteBlend,
    Lerp,
    LerpRotate,
    Ln,
    Max,
    Min,
    MinAngle,
    Mod,
    Pow,
    Random,
    RandomInteger,
    Round,
    Sin,
    Sqrt,
    Trunc,
}

impl MathFn {
    pub const ALL: [MathFn; 27] = [
        MathFn::Abs,
        MathFn::Acos,
        MathFn::Asin,
        MathFn::Atan,
        MathFn::Atan2,
        MathFn::Ceil,
        MathFn::Clamp,
        MathFn::Cos,
        MathFn::DieRoll,
        MathFn::DieRollInteger,
        MathFn::Exp,
        MathFn::Floor,
        MathFn::HermiteBlend,
        MathFn::Lerp,
        MathFn::LerpRotate,
        MathFn::Ln,
        MathFn::Max,
        MathFn::Min,
        MathFn::MinAngle,
        MathFn::Mod,
        MathFn::Pow,
        MathFn::Random,
        MathFn::RandomInteger,
        MathFn::Round,
        MathFn::Sin,
        MathFn::Sqrt,
        MathFn::Trunc,
    ];

    /// Look up a function by its lower-cased member name.
    pub fn lookup(name: &str) -> Option<MathFn> {
        Self::ALL.iter().copied().find(|f| f.name() == name)
    }

    pub fn name(self) -> &'static str {
        match self {
            MathFn::Abs => "abs",
            MathFn::Acos => "acos",
            MathFn::Asin => "asin",
            MathFn::Atan => "atan",
            MathFn::Atan2 => "atan2",
            MathFn::Ceil => "ceil",
            MathFn::Clamp => "clamp",
            MathFn::Cos => "cos",
            MathFn::DieRoll => "die_roll",
            MathFn::DieRollInteger => "die_roll_integer",
            MathFn::Exp => "exp",
            MathFn::Floor => "floor",
            MathFn::HermiteBlend => "hermite_blend",
            MathFn::Lerp => "lerp",
            MathFn::LerpRotate => "lerprotate",
            MathFn::Ln => "ln",
            MathFn::Max => "max",
            MathFn::Min => "min",
            MathFn::MinAngle => "min_angle",
            MathFn::Mod => "mod",
            MathFn::Pow => "pow",
            MathFn::Random => "random",
            MathFn::RandomInteger => "random_integer",
            MathFn::Round => "round",
            MathFn::Sin => "sin",
            MathFn::Sqrt => "sqrt",
            MathFn::Trunc => "trunc",
        }
    }

    /// Exact number of arguments the function takes.
    pub fn arity(self) -> usize {
        match self {
            MathFn::Abs
            | MathFn::Acos
            | MathFn::Asin
            | MathFn::Atan
            | MathFn::Ceil
            | MathFn::Cos
            | MathFn::Exp
            | MathFn::Floor
            | MathFn::HermiteBlend
            | MathFn::Ln
            | MathFn::MinAngle
            | MathFn::Round
            | MathFn::Sin
            | MathFn::Sqrt
            | MathFn::Trunc => 1,
            MathFn::Atan2
            | MathFn::Max
            | MathFn::Min
            | MathFn::Mod
            | MathFn::Pow
            | MathFn::Random
            | MathFn::RandomInteger => 2,
            MathFn::Clamp
            | MathFn::DieRoll
            | MathFn::DieRollInteger
            | MathFn::Lerp
            | MathFn::LerpRotate => 3,
        }
    }

    /// Pure functions may be folded at compile time.
    pub fn is_pure(self) -> bool {
        !matches!(
            self,
            MathFn::Random | MathFn::RandomInteger | MathFn::DieRoll | MathFn::DieRollInteger
        )
    }

    /// Evaluate a pure function. Returns `None` for the random family or when
    /// `args` does not match the arity.
    pub fn apply_pure(self, args: &[f64]) -> Option<f64> {
        if args.len() != self.arity() || !self.is_pure() {
            return None;
        }
        let a = args[0];
        let result = match self {
            MathFn::Abs => a.abs(),
            MathFn::Acos => a.acos().to_degrees(),
            MathFn::Asin => a.asin().to_degrees(),
            MathFn::Atan => a.atan().to_degrees(),
            MathFn::Atan2 => a.atan2(args[1]).to_degrees(),
            MathFn::Ceil => a.ceil(),
            MathFn::Clamp => a.min(args[2]).max(args[1]),
            MathFn::Cos => a.to_radians().cos(),
            MathFn::Exp => a.exp(),
            MathFn::Floor => a.floor(),
            MathFn::HermiteBlend => {
                let t2 = a * a;
                3.0 * t2 - 2.0 * t2 * a
            }
            MathFn::Lerp => a + args[2] * (args[1] - a),
            MathFn::LerpRotate => lerp_rotate(a, args[1], args[2]),
            MathFn::Ln => a.ln(),
            MathFn::Max => a.max(args[1]),
            MathFn::Min => a.min(args[1]),
            MathFn::MinAngle => min_angle(a),
            MathFn::Mod => a % args[1],
            MathFn::Pow => a.powf(args[1]),
            // Half-way cases round toward positive infinity.
            MathFn::Round => (a + 0.5).floor(),
            MathFn::Sin => a.to_radians().sin(),
            MathFn::Sqrt => a.sqrt(),
            MathFn::Trunc => a.trunc(),
            MathFn::Random | MathFn::RandomInteger | MathFn::DieRoll | MathFn::DieRollInteger => {
                return None
            }
        };
        Some(result)
    }

    /// Evaluate any function, drawing from `rng` for the random family.
    ///
    /// Missing arguments read as `0`, extra ones are ignored; the resolver has
    /// already rejected arity mismatches for compiled expressions.
    pub fn apply(self, args: &[f64], rng: &mut dyn RandomSource) -> f64 {
        let mut padded = [0.0; 3];
        for (slot, value) in padded.iter_mut().zip(args) {
            *slot = *value;
        }
        let [a, b, c] = padded;
        match self {
            MathFn::Random => a + rng.next_f64() * (b - a),
            MathFn::RandomInteger => random_integer(a, b, rng),
            MathFn::DieRoll => {
                let mut total = 0.0;
                for _ in 0..dice_count(a) {
                    total += b + rng.next_f64() * (c - b);
                }
                total
            }
            MathFn::DieRollInteger => {
                let mut total = 0.0;
                for _ in 0..dice_count(a) {
                    total += random_integer(b, c, rng);
                }
                total
            }
            pure => pure
                .apply_pure(&padded[..pure.arity()])
                .unwrap_or(f64::NAN),
        }
    }
}

/// Wrap an angle into `[0, 360)`. `NaN` and infinities stay non-finite.
fn radify(angle: f64) -> f64 {
    (((angle + 180.0) % 360.0) + 180.0) % 360.0
}

fn lerp_rotate(start: f64, end: f64, t: f64) -> f64 {
    let mut start = radify(start);
    let mut end = radify(end);
    if start > end {
        std::mem::swap(&mut start, &mut end);
    }
    let diff = end - start;
    if diff > 180.0 {
        radify(end + t * (360.0 - diff))
    } else {
        start + t * diff
    }
}

/// Normalize an angle into `[-180, 180]`.
fn min_angle(angle: f64) -> f64 {
    let wrapped = angle % 360.0;
    if wrapped > 180.0 {
        wrapped - 360.0
    } else if wrapped < -180.0 {
        wrapped + 360.0
    } else {
        wrapped
    }
}

/// Uniform integer in `[low, high]`, both bounds truncated and inclusive.
fn random_integer(low: f64, high: f64, rng: &mut dyn RandomSource) -> f64 {
    let (mut low, mut high) = (low.trunc(), high.trunc());
    if low > high {
        std::mem::swap(&mut low, &mut high);
    }
    low + (rng.next_f64() * (high - low + 1.0)).floor()
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn dice_count(amount: f64) -> u32 {
    if amount >= 1.0 {
        amount.min(f64::from(MAX_DICE)) as u32
    } else {
        0
    }
}
