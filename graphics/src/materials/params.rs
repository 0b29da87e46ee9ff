//! Effect parameters and their live storage.
//!
//! [`EffectParameters`] is a plain `Copy` value. Each material instance owns
//! exactly one [`ParameterBlock`] holding its current value; edits replace
//! the whole struct under one lock so a draw never observes half an update.

use std::fmt;
use std::sync::Arc;

use parking_lot::Mutex;
use tinted_core::Rgb;

use crate::error::GraphicsError;

/// Smallest accepted `gradientStrength`. Zero would collapse the smoothstep edges.
pub const GRADIENT_STRENGTH_MIN: f32 = 1e-4;

/// Largest accepted `gradientStrength`. The smoothstep band `2 * g` must stay finite.
pub const GRADIENT_STRENGTH_MAX: f32 = 1e6;

/// Smallest accepted `cornerExponent`.
pub const CORNER_EXPONENT_MIN: f32 = 0.0;

/// One adjustable field of [`EffectParameters`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EffectField {
    GradientStrength,
    CornerExponent,
    TopColor,
    BottomColor,
}

impl EffectField {
    /// All fields, in uniform-slot order.
    pub const ALL: [EffectField; 4] = [
        EffectField::GradientStrength,
        EffectField::CornerExponent,
        EffectField::TopColor,
        EffectField::BottomColor,
    ];

    /// Name of the uniform this field feeds.
    pub fn uniform_name(self) -> &'static str {
        match self {
            Self::GradientStrength => "gradientStrength",
            Self::CornerExponent => "cornerExponent",
            Self::TopColor => "topColor",
            Self::BottomColor => "bottomColor",
        }
    }

    /// Human-readable label for debug panels.
    pub fn label(self) -> &'static str {
        match self {
            Self::GradientStrength => "Gradient Strength",
            Self::CornerExponent => "Corner Exponent",
            Self::TopColor => "Top Color",
            Self::BottomColor => "Bottom Color",
        }
    }

    /// `true` for the two color fields.
    pub fn is_color(self) -> bool {
        matches!(self, Self::TopColor | Self::BottomColor)
    }

    /// Inclusive valid range of a scalar field, `None` for colors.
    pub fn scalar_range(self) -> Option<(f32, f32)> {
        match self {
            Self::GradientStrength => Some((GRADIENT_STRENGTH_MIN, GRADIENT_STRENGTH_MAX)),
            Self::CornerExponent => Some((CORNER_EXPONENT_MIN, f32::MAX)),
            Self::TopColor | Self::BottomColor => None,
        }
    }

    /// Look a field up by uniform name.
    pub fn from_uniform_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|f| f.uniform_name() == name)
    }
}

impl fmt::Display for EffectField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.uniform_name())
    }
}

bitflags::bitflags! {
    /// Set of [`EffectField`]s, used to track which uniforms need re-uploading.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct EffectFields: u32 {
        const GRADIENT_STRENGTH = 1 << 0;
        const CORNER_EXPONENT = 1 << 1;
        const TOP_COLOR = 1 << 2;
        const BOTTOM_COLOR = 1 << 3;
    }
}

impl From<EffectField> for EffectFields {
    fn from(field: EffectField) -> Self {
        match field {
            EffectField::GradientStrength => Self::GRADIENT_STRENGTH,
            EffectField::CornerExponent => Self::CORNER_EXPONENT,
            EffectField::TopColor => Self::TOP_COLOR,
            EffectField::BottomColor => Self::BOTTOM_COLOR,
        }
    }
}

impl EffectFields {
    /// Iterate contained fields in uniform-slot order.
    pub fn fields(self) -> impl Iterator<Item = EffectField> {
        EffectField::ALL
            .into_iter()
            .filter(move |f| self.contains(EffectFields::from(*f)))
    }
}

/// Value written to one field.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ParameterValue {
    /// Scalar field value.
    Scalar(f32),
    /// Color field value.
    Color(Rgb),
}

impl From<f32> for ParameterValue {
    fn from(v: f32) -> Self {
        Self::Scalar(v)
    }
}

impl From<Rgb> for ParameterValue {
    fn from(c: Rgb) -> Self {
        Self::Color(c)
    }
}

impl fmt::Display for ParameterValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Scalar(v) => write!(f, "{v}"),
            Self::Color(c) => write!(f, "{c}"),
        }
    }
}

/// Report of a value that was clamped into its field's range.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParameterOutOfRange {
    pub field: EffectField,
    pub requested: ParameterValue,
    pub applied: ParameterValue,
}

impl fmt::Display for ParameterOutOfRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} out of range: requested {}, applied {}",
            self.field, self.requested, self.applied
        )
    }
}

/// Outcome of a successful parameter write.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ParameterFeedback {
    /// The value was in range and stored as given.
    Applied(ParameterValue),
    /// The value was clamped before being stored.
    Clamped(ParameterOutOfRange),
}

impl ParameterFeedback {
    /// The value that is now stored.
    pub fn applied(&self) -> ParameterValue {
        match self {
            Self::Applied(v) => *v,
            Self::Clamped(report) => report.applied,
        }
    }

    pub fn was_clamped(&self) -> bool {
        matches!(self, Self::Clamped(_))
    }
}

/// Clamp a scalar into `[min, max]`. NaN maps to `min`.
fn clamp_scalar(v: f32, (min, max): (f32, f32)) -> f32 {
    if v.is_nan() { min } else { v.clamp(min, max) }
}

/// Uniform values of the gradient/corner effect.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EffectParameters {
    /// Half-width of the vertical smoothstep band, in local units. Must be > 0.
    pub gradient_strength: f32,
    /// Exponent of the corner falloff. Must be >= 0.
    pub corner_exponent: f32,
    /// Color at the top of the gradient.
    pub top_color: Rgb,
    /// Color at the bottom of the gradient.
    pub bottom_color: Rgb,
}

impl Default for EffectParameters {
    fn default() -> Self {
        Self {
            gradient_strength: 1.0,
            corner_exponent: 2.0,
            top_color: Rgb::WHITE,
            bottom_color: Rgb::from_hex(0x333333),
        }
    }
}

impl EffectParameters {
    /// Create a parameter set. Values are stored as given; see [`Self::sanitized`].
    pub fn new(
        gradient_strength: f32,
        corner_exponent: f32,
        top_color: Rgb,
        bottom_color: Rgb,
    ) -> Self {
        Self {
            gradient_strength,
            corner_exponent,
            top_color,
            bottom_color,
        }
    }

    /// Current value of one field.
    pub fn get(&self, field: EffectField) -> ParameterValue {
        match field {
            EffectField::GradientStrength => ParameterValue::Scalar(self.gradient_strength),
            EffectField::CornerExponent => ParameterValue::Scalar(self.corner_exponent),
            EffectField::TopColor => ParameterValue::Color(self.top_color),
            EffectField::BottomColor => ParameterValue::Color(self.bottom_color),
        }
    }

    /// Copy with one field replaced, clamping the value into range.
    ///
    /// Fails only when the value kind does not match the field.
    pub fn with_field(
        mut self,
        field: EffectField,
        value: ParameterValue,
    ) -> Result<(Self, ParameterFeedback), GraphicsError> {
        let applied = match (field.scalar_range(), value) {
            (Some(range), ParameterValue::Scalar(v)) => {
                let v = clamp_scalar(v, range);
                match field {
                    EffectField::GradientStrength => self.gradient_strength = v,
                    _ => self.corner_exponent = v,
                }
                ParameterValue::Scalar(v)
            }
            (None, ParameterValue::Color(c)) => {
                let c = c.clamped();
                match field {
                    EffectField::TopColor => self.top_color = c,
                    _ => self.bottom_color = c,
                }
                ParameterValue::Color(c)
            }
            _ => {
                return Err(GraphicsError::InvalidParameter(format!(
                    "{field} does not accept {value:?}"
                )));
            }
        };

        // NaN never compares equal, so a NaN request is always reported.
        let feedback = if applied == value {
            ParameterFeedback::Applied(applied)
        } else {
            ParameterFeedback::Clamped(ParameterOutOfRange {
                field,
                requested: value,
                applied,
            })
        };
        Ok((self, feedback))
    }

    /// Copy with every field clamped into range, plus a report per clamped field.
    pub fn sanitized(self) -> (Self, Vec<ParameterOutOfRange>) {
        let mut out = self;
        let mut reports = Vec::new();
        for field in EffectField::ALL {
            // Kinds always match here, so the error arm is unreachable.
            if let Ok((next, ParameterFeedback::Clamped(report))) =
                out.with_field(field, self.get(field))
            {
                out = next;
                reports.push(report);
            }
        }
        (out, reports)
    }

    /// `true` when every field is inside its range.
    pub fn is_valid(&self) -> bool {
        self.sanitized().1.is_empty()
    }

    /// Fields whose values differ from `other`.
    pub fn changed_fields(&self, other: &EffectParameters) -> EffectFields {
        EffectField::ALL
            .into_iter()
            .filter(|f| self.get(*f) != other.get(*f))
            .fold(EffectFields::empty(), |acc, f| acc | EffectFields::from(f))
    }
}

struct BlockState {
    params: EffectParameters,
    revision: u64,
}

/// Live, exclusively owned storage for one instance's [`EffectParameters`].
///
/// Not `Clone`: a block is created by value-copying caller parameters and is
/// shared only between the instance that owns it and that instance's
/// augmented program.
pub struct ParameterBlock {
    state: Arc<Mutex<BlockState>>,
}

impl ParameterBlock {
    /// Create a block from a copy of `params`, clamped into range.
    pub fn new(params: EffectParameters) -> Self {
        let (params, reports) = params.sanitized();
        for report in &reports {
            log::debug!("Initial parameter clamped: {report}");
        }
        Self {
            state: Arc::new(Mutex::new(BlockState {
                params,
                revision: 0,
            })),
        }
    }

    /// Second reference to the same storage, for the owning instance's program binding.
    pub(crate) fn share(&self) -> Self {
        Self {
            state: Arc::clone(&self.state),
        }
    }

    /// Copy of the current value.
    pub fn get(&self) -> EffectParameters {
        self.state.lock().params
    }

    /// Current value together with its revision.
    pub fn snapshot(&self) -> (EffectParameters, u64) {
        let state = self.state.lock();
        (state.params, state.revision)
    }

    /// Revision counter, bumped on every write.
    pub fn revision(&self) -> u64 {
        self.state.lock().revision
    }

    /// Replace the whole value (clamped into range).
    pub fn replace(&self, params: EffectParameters) -> Vec<ParameterOutOfRange> {
        let (params, reports) = params.sanitized();
        let mut state = self.state.lock();
        state.params = params;
        state.revision += 1;
        reports
    }

    /// Replace one field, building the new value from a copy of the old one.
    pub fn update(
        &self,
        field: EffectField,
        value: ParameterValue,
    ) -> Result<ParameterFeedback, GraphicsError> {
        let mut state = self.state.lock();
        let (next, feedback) = state.params.with_field(field, value)?;
        state.params = next;
        state.revision += 1;
        Ok(feedback)
    }

    /// `true` when both blocks refer to the same storage.
    pub fn ptr_eq(&self, other: &ParameterBlock) -> bool {
        Arc::ptr_eq(&self.state, &other.state)
    }
}

impl fmt::Debug for ParameterBlock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (params, revision) = self.snapshot();
        f.debug_struct("ParameterBlock")
            .field("params", &params)
            .field("revision", &revision)
            .finish()
    }
}

static_assertions::assert_impl_all!(ParameterBlock: Send, Sync);
static_assertions::assert_not_impl_any!(ParameterBlock: Clone);
