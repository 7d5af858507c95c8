use std::{fmt, sync::Arc};

use ndarray::{Array1, Array2, Array3, ArrayView1};

use crate::{Error, Point, ProblemError};

type ObjectivesFn = dyn Fn(ArrayView1<'_, f64>) -> Array1<f64> + Send + Sync;
type JacobianFn = dyn Fn(ArrayView1<'_, f64>) -> Array2<f64> + Send + Sync;
type HessianFn = dyn Fn(ArrayView1<'_, f64>) -> Array3<f64> + Send + Sync;

/// An immutable vector-valued minimization problem.
///
/// A problem maps `n_vars` inputs to `n_objectives` objective values and
/// supplies the Jacobian of that map (row `i` is the gradient of objective
/// `i`). A Hessian map and one display equation per objective are optional.
///
/// `Problem` is a cheap handle: cloning it shares the same definition, which
/// is how every [`Point`] keeps a reference to the problem that produced it.
/// Build one with [`Problem::builder`].
#[derive(Clone)]
pub struct Problem {
    inner: Arc<Definition>,
}

struct Definition {
    n_vars: usize,
    n_objectives: usize,
    objectives: Box<ObjectivesFn>,
    jacobian: Box<JacobianFn>,
    hessian: Option<Box<HessianFn>>,
    equations: Vec<String>,
}

impl Problem {
    /// Starts building a problem with `n_vars` inputs and `n_objectives` objectives.
    #[must_use]
    pub fn builder(n_vars: usize, n_objectives: usize) -> ProblemBuilder {
        ProblemBuilder {
            n_vars,
            n_objectives,
            objectives: None,
            jacobian: None,
            hessian: None,
            equations: Vec::new(),
        }
    }

    /// Returns the number of input variables.
    #[must_use]
    pub fn n_vars(&self) -> usize {
        self.inner.n_vars
    }

    /// Returns the number of objectives.
    #[must_use]
    pub fn n_objectives(&self) -> usize {
        self.inner.n_objectives
    }

    /// Returns the display equations, one per objective, or an empty slice.
    #[must_use]
    pub fn equations(&self) -> &[String] {
        &self.inner.equations
    }

    /// Returns `true` if a Hessian map is defined.
    #[must_use]
    pub fn has_hessian(&self) -> bool {
        self.inner.hessian.is_some()
    }

    /// Returns `true` if both handles share the same definition.
    #[must_use]
    pub fn ptr_eq(&self, other: &Problem) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }

    /// Evaluates the problem at `x`.
    ///
    /// Computes the objective values, the Jacobian and the Euclidean norm of
    /// each Jacobian row, and bundles them with `x` into a new [`Point`].
    /// The result depends only on `x` and the problem's maps.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DimensionMismatch`] if `x` does not have `n_vars` entries.
    pub fn evaluate(&self, x: impl Into<Array1<f64>>) -> Result<Point, Error> {
        let inputs = x.into();
        self.check_len(inputs.len())?;

        let objective_values = (self.inner.objectives)(inputs.view());
        let jacobian = (self.inner.jacobian)(inputs.view());
        let gradient_norms = jacobian
            .outer_iter()
            .map(|row| row.dot(&row).sqrt())
            .collect();

        Ok(Point::new(
            inputs,
            objective_values,
            jacobian,
            gradient_norms,
            self.clone(),
        ))
    }

    /// Evaluates the Hessian tensor at `x`, shaped `(n_objectives, n_vars, n_vars)`.
    ///
    /// Returns `Ok(None)` when the problem has no Hessian map.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DimensionMismatch`] if `x` does not have `n_vars` entries.
    pub fn hessian(&self, x: ArrayView1<'_, f64>) -> Result<Option<Array3<f64>>, Error> {
        self.check_len(x.len())?;
        Ok(self.inner.hessian.as_ref().map(|hessian| hessian(x)))
    }

    fn check_len(&self, found: usize) -> Result<(), Error> {
        if found == self.inner.n_vars {
            Ok(())
        } else {
            Err(Error::DimensionMismatch {
                expected: self.inner.n_vars,
                found,
            })
        }
    }
}

impl fmt::Debug for Problem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Problem")
            .field("n_vars", &self.inner.n_vars)
            .field("n_objectives", &self.inner.n_objectives)
            .field("has_hessian", &self.has_hessian())
            .field("equations", &self.inner.equations)
            .finish_non_exhaustive()
    }
}

/// Builder for [`Problem`].
///
/// The objective and Jacobian maps are required. [`build`](Self::build)
/// evaluates every defined map once at the zero vector and rejects any map whose
/// output shape disagrees with the declared dimensions.
pub struct ProblemBuilder {
    n_vars: usize,
    n_objectives: usize,
    objectives: Option<Box<ObjectivesFn>>,
    jacobian: Option<Box<JacobianFn>>,
    hessian: Option<Box<HessianFn>>,
    equations: Vec<String>,
}

impl ProblemBuilder {
    /// Sets the objective map, `R^n_vars -> R^n_objectives`.
    #[must_use]
    pub fn objectives<F>(mut self, f: F) -> Self
    where
        F: Fn(ArrayView1<'_, f64>) -> Array1<f64> + Send + Sync + 'static,
    {
        self.objectives = Some(Box::new(f));
        self
    }

    /// Sets the Jacobian map, returning an `(n_objectives, n_vars)` matrix.
    #[must_use]
    pub fn jacobian<F>(mut self, f: F) -> Self
    where
        F: Fn(ArrayView1<'_, f64>) -> Array2<f64> + Send + Sync + 'static,
    {
        self.jacobian = Some(Box::new(f));
        self
    }

    /// Sets the Hessian map, returning an `(n_objectives, n_vars, n_vars)` tensor.
    #[must_use]
    pub fn hessian<F>(mut self, f: F) -> Self
    where
        F: Fn(ArrayView1<'_, f64>) -> Array3<f64> + Send + Sync + 'static,
    {
        self.hessian = Some(Box::new(f));
        self
    }

    /// Sets one display equation per objective.
    #[must_use]
    pub fn equations<I, S>(mut self, equations: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.equations = equations.into_iter().map(Into::into).collect();
        self
    }

    /// Validates the definition and builds the problem.
    ///
    /// # Errors
    ///
    /// Returns a [`ProblemError`] if a required map is missing, a dimension is
    /// zero, a map disagrees with the declared dimensions, or the number of
    /// display equations does not match the number of objectives.
    pub fn build(self) -> Result<Problem, ProblemError> {
        let (m, n) = (self.n_vars, self.n_objectives);
        if m == 0 {
            return Err(ProblemError::Empty {
                what: "input variable",
            });
        }
        if n == 0 {
            return Err(ProblemError::Empty { what: "objective" });
        }
        let objectives = self.objectives.ok_or(ProblemError::MissingObjectives)?;
        let jacobian = self.jacobian.ok_or(ProblemError::MissingJacobian)?;

        let origin = Array1::<f64>::zeros(m);

        let found = objectives(origin.view()).len();
        if found != n {
            return Err(ProblemError::ObjectivesShape { expected: n, found });
        }

        let found = jacobian(origin.view()).dim();
        if found != (n, m) {
            return Err(ProblemError::JacobianShape {
                expected: (n, m),
                found,
            });
        }

        if let Some(hessian) = &self.hessian {
            let found = hessian(origin.view()).dim();
            if found != (n, m, m) {
                return Err(ProblemError::HessianShape {
                    expected: (n, m, m),
                    found,
                });
            }
        }

        if !self.equations.is_empty() && self.equations.len() != n {
            return Err(ProblemError::EquationCount {
                expected: n,
                found: self.equations.len(),
            });
        }

        Ok(Problem {
            inner: Arc::new(Definition {
                n_vars: m,
                n_objectives: n,
                objectives,
                jacobian,
                hessian: self.hessian,
                equations: self.equations,
            }),
        })
    }
}
