#![forbid(unsafe_code)]

//! Taylor diagram data model (headless).
//!
//! A Taylor diagram condenses how well candidate series match a reference
//! series into one polar chart: Pearson correlation becomes the angular
//! position (`theta = acos(r)`) and standard deviation the radial one.
//! This crate owns the validated model and the statistics; layout and SVG
//! emission live in `taylogram-render`.
//!
//! Design goals:
//! - every boundary constraint is checked once, in [`TaylorDiagram::new`];
//!   after that the model is immutable and rendering cannot fail on data
//! - deterministic, testable outputs (pure derivation, no ambient state)

pub mod error;
pub mod geom;
pub mod stats;
pub mod style;

pub use error::{Error, Result};
pub use style::{DiagramOptions, MarkerShape, PointStyle, StyleConfig};

use indexmap::IndexMap;

/// An ordered, named numeric sequence. Immutable once constructed.
#[derive(Debug, Clone, PartialEq)]
pub struct Series {
    name: String,
    values: Vec<f64>,
}

impl Series {
    pub fn new(name: impl Into<String>, values: Vec<f64>) -> Self {
        Self {
            name: name.into(),
            values,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Ordered name -> values mapping, index-aligned with the reference.
pub type SampleSet = IndexMap<String, Vec<f64>>;

/// A sample's derived place on the diagram.
#[derive(Debug, Clone, PartialEq)]
pub struct SamplePoint {
    pub name: String,
    /// Pearson correlation with the reference, clamped into [0, 1].
    pub correlation: f64,
    /// `acos(correlation)`, in [0, pi/2].
    pub theta: f64,
    /// Sample standard deviation.
    pub radius: f64,
}

/// The validated diagram model: reference statistics plus one derived point
/// per sample, in input order. Construction performs every boundary check;
/// see [`Error`] for the taxonomy.
#[derive(Debug, Clone)]
pub struct TaylorDiagram {
    reference: Series,
    refstd: f64,
    samples: Vec<SamplePoint>,
    styles: StyleConfig,
    options: DiagramOptions,
}

fn check_finite(name: &str, values: &[f64]) -> Result<()> {
    for (index, v) in values.iter().enumerate() {
        if !v.is_finite() {
            return Err(Error::NonFiniteValue {
                name: name.to_string(),
                index,
            });
        }
    }
    Ok(())
}

impl TaylorDiagram {
    /// Builds the model, failing fast on the first violated constraint:
    /// degenerate options, empty or non-finite series, index misalignment,
    /// zero variance,
    /// a style list shorter than the sample count, or a sample that
    /// correlates negatively with the reference (the diagram surface only
    /// spans the [0, pi/2] quadrant).
    pub fn new(
        reference: Series,
        samples: SampleSet,
        styles: StyleConfig,
        options: DiagramOptions,
    ) -> Result<Self> {
        options.validate()?;
        if reference.is_empty() {
            return Err(Error::EmptySeries {
                name: reference.name.clone(),
            });
        }
        check_finite(&reference.name, &reference.values)?;
        if samples.is_empty() {
            return Err(Error::NoSamples);
        }
        if styles.samples.len() < samples.len() {
            return Err(Error::StyleShortfall {
                styles: styles.samples.len(),
                samples: samples.len(),
            });
        }

        let refstd = stats::stddev(&reference.values);
        if !(refstd > 0.0) {
            return Err(Error::ZeroVariance {
                name: reference.name.clone(),
            });
        }

        let mut points = Vec::with_capacity(samples.len());
        for (name, values) in &samples {
            if values.is_empty() {
                return Err(Error::EmptySeries { name: name.clone() });
            }
            if values.len() != reference.len() {
                return Err(Error::LengthMismatch {
                    name: name.clone(),
                    sample_len: values.len(),
                    reference: reference.name.clone(),
                    reference_len: reference.len(),
                });
            }
            check_finite(name, values)?;

            let r = stats::clamp_correlation(stats::pearson(&reference.values, values));
            if r.is_nan() {
                return Err(Error::ZeroVariance { name: name.clone() });
            }
            if r < 0.0 {
                return Err(Error::NegativeCorrelation {
                    name: name.clone(),
                    r,
                });
            }
            points.push(SamplePoint {
                name: name.clone(),
                correlation: r,
                theta: r.acos(),
                radius: stats::stddev(values),
            });
        }

        Ok(Self {
            reference,
            refstd,
            samples: points,
            styles,
            options,
        })
    }

    /// Convenience constructor with default styles and options.
    pub fn with_defaults(reference: Series, samples: SampleSet) -> Result<Self> {
        Self::new(
            reference,
            samples,
            StyleConfig::default(),
            DiagramOptions::default(),
        )
    }

    pub fn reference(&self) -> &Series {
        &self.reference
    }

    /// Standard deviation of the reference series.
    pub fn refstd(&self) -> f64 {
        self.refstd
    }

    /// Derived sample points, in input order.
    pub fn samples(&self) -> &[SamplePoint] {
        &self.samples
    }

    pub fn styles(&self) -> &StyleConfig {
        &self.styles
    }

    pub fn options(&self) -> &DiagramOptions {
        &self.options
    }

    /// Radial axis extent: `scale * max(refstd, sample stds)`.
    pub fn radial_extent(&self) -> f64 {
        let max_std = self
            .samples
            .iter()
            .map(|p| p.radius)
            .fold(self.refstd, f64::max);
        max_std * self.options.scale
    }

    /// Largest sample radius; the display-only clip bound. Never smaller
    /// than the reference radius, so the reference point stays visible on
    /// its own diagram.
    pub fn view_radius(&self) -> f64 {
        self.samples
            .iter()
            .map(|p| p.radius)
            .fold(self.refstd, f64::max)
    }
}
