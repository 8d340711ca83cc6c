// ─────────────────────────────────────────────────────────────────────
// ChaosLink — PyO3 FFI Bindings
// (C) 1998-2026 Miroslav Sotek. All rights reserved.
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
// Note: #[deny(unsafe_code)] not applied — PyO3 proc macros generate
// unsafe blocks internally. All hand-written code in this crate is safe.
//! Python-callable wrappers around the ChaosLink codecs.
//!
//! # FFI Safety
//!
//! - GIL acquired via `Python::with_gil` before every Python callback.
//! - Python exceptions in message callbacks → 0.0 (logged), so a
//!   misbehaving callback degrades recovery instead of aborting a solve.
//! - Arguments validated before any integration (`ValueError`);
//!   integration and audio failures raise `RuntimeError`.
//!
//! Install: `pip install -e crates/chaoslink-ffi` (requires maturin).
//!
//! Usage from Python:
//! ```python
//! from chaoslink import LorenzParams, constant, embed_message, recover_message
//!
//! p = LorenzParams()
//! secret = embed_message((2.2, 1.3, 2.0), p, 0.0, 4.0, constant(0.0))
//! recovered = recover_message((2.2, 1.3, 2.0), p, 0.0, 4.0, secret)
//! print(recovered(1.5))
//! ```

use std::path::PathBuf;
use std::sync::Arc;

use pyo3::exceptions::{PyRuntimeError, PyValueError};
use pyo3::prelude::*;

use chaoslink_audio::NoiseConfig;
use chaoslink_codec::{BitModulation, BitStepSignal, EmbedConfig, RecoverConfig};
use chaoslink_dynamics::LorenzParams;
use chaoslink_types::{
    sample_uniform, ChaosLinkError, ConstSignal, FnSignal, Signal, SolverConfig, State, TimeSpan,
};

fn to_py_err(e: ChaosLinkError) -> PyErr {
    match e {
        ChaosLinkError::InvalidArgument(_) | ChaosLinkError::Config(_) => {
            PyValueError::new_err(e.to_string())
        }
        _ => PyRuntimeError::new_err(e.to_string()),
    }
}

fn span(t0: f64, t1: f64) -> PyResult<TimeSpan> {
    TimeSpan::new(t0, t1).map_err(to_py_err)
}

// ─── PyLorenzParams ─────────────────────────────────────────────────

/// Python-visible parameter set (σ, r, b).
#[pyclass(name = "LorenzParams")]
#[derive(Clone)]
struct PyLorenzParams {
    inner: LorenzParams,
}

#[pymethods]
impl PyLorenzParams {
    #[new]
    #[pyo3(signature = (sigma = 16.0, r = 45.6, b = 4.0))]
    fn new(sigma: f64, r: f64, b: f64) -> PyResult<Self> {
        let inner = LorenzParams::new(sigma, r, b).map_err(to_py_err)?;
        Ok(Self { inner })
    }

    #[getter]
    fn sigma(&self) -> f64 {
        self.inner.sigma
    }

    #[getter]
    fn r(&self) -> f64 {
        self.inner.r
    }

    #[getter]
    fn b(&self) -> f64 {
        self.inner.b
    }

    /// Same σ and r with a different b.
    fn with_b(&self, b: f64) -> PyResult<Self> {
        let inner = LorenzParams::new(self.inner.sigma, self.inner.r, b).map_err(to_py_err)?;
        Ok(Self { inner })
    }

    fn __repr__(&self) -> String {
        format!(
            "LorenzParams(sigma={}, r={}, b={})",
            self.inner.sigma, self.inner.r, self.inner.b
        )
    }
}

// ─── PySolverConfig ─────────────────────────────────────────────────

/// Python-visible solver configuration.
#[pyclass(name = "SolverConfig")]
#[derive(Clone)]
struct PySolverConfig {
    inner: SolverConfig,
}

#[pymethods]
impl PySolverConfig {
    #[new]
    #[pyo3(signature = (
        abs_tol = 1e-11,
        rel_tol = 1e-11,
        initial_step = 0.0,
        max_step = 0.0,
        min_step = 1e-13,
        max_steps = 5_000_000,
        deadline_ms = 0,
    ))]
    fn new(
        abs_tol: f64,
        rel_tol: f64,
        initial_step: f64,
        max_step: f64,
        min_step: f64,
        max_steps: u64,
        deadline_ms: u64,
    ) -> PyResult<Self> {
        let config = SolverConfig {
            abs_tol,
            rel_tol,
            initial_step,
            max_step,
            min_step,
            max_steps,
            deadline_ms,
        };
        config.validate().map_err(to_py_err)?;
        Ok(Self { inner: config })
    }

    /// Construct from JSON string.
    #[staticmethod]
    fn from_json(json: &str) -> PyResult<Self> {
        let config = SolverConfig::from_json(json).map_err(to_py_err)?;
        config.validate().map_err(to_py_err)?;
        Ok(Self { inner: config })
    }

    fn __repr__(&self) -> String {
        format!(
            "SolverConfig(abs_tol={}, rel_tol={}, max_steps={})",
            self.inner.abs_tol, self.inner.rel_tol, self.inner.max_steps
        )
    }
}

// ─── PySignal ───────────────────────────────────────────────────────

/// A scalar function of time — trajectory component, secret message,
/// recovered message, error signal, or Python callback.
#[pyclass(name = "Signal")]
#[derive(Clone)]
struct PySignal {
    inner: Arc<dyn Signal>,
}

#[pymethods]
impl PySignal {
    fn __call__(&self, t: f64) -> f64 {
        self.inner.value_at(t)
    }

    /// Evaluate at `n` uniformly spaced times; returns (t, value) pairs
    /// for plotting.
    fn sample(&self, t0: f64, t1: f64, n: usize) -> PyResult<Vec<(f64, f64)>> {
        let span = span(t0, t1)?;
        Ok(sample_uniform(self.inner.as_ref(), span, n))
    }

    fn __repr__(&self) -> String {
        "Signal(<fn of t>)".to_string()
    }
}

/// Constant signal.
#[pyfunction]
fn constant(value: f64) -> PySignal {
    PySignal {
        inner: Arc::new(ConstSignal(value)),
    }
}

/// Wrap a Python callable `f(t) -> float` as a signal. Exceptions and
/// non-float returns are logged and read as 0.0.
#[pyfunction]
fn from_callable(callback: Py<PyAny>) -> PySignal {
    let signal = FnSignal::new(move |t| {
        Python::with_gil(|py| match callback.call1(py, (t,)) {
            Ok(v) => v.extract::<f64>(py).unwrap_or_else(|_| {
                log::error!("message callback returned a non-float; treating as 0.0");
                0.0
            }),
            Err(_) => {
                log::error!("message callback raised; treating as 0.0");
                0.0
            }
        })
    });
    PySignal {
        inner: Arc::new(signal),
    }
}

/// Pointwise |a(t) − b(t)| between two signals.
#[pyfunction]
fn error_signal(a: &PySignal, b: &PySignal) -> PySignal {
    let err = chaoslink_dynamics::ErrorSignal::abs(a.inner.clone(), b.inner.clone());
    PySignal {
        inner: Arc::new(err),
    }
}

// ─── Codec operations ───────────────────────────────────────────────

fn solver_or_default(solver: Option<PySolverConfig>) -> SolverConfig {
    solver.map(|s| s.inner).unwrap_or_default()
}

/// Embed a message under the chaotic carrier; returns the secret signal.
#[pyfunction]
#[pyo3(signature = (u0, params, t0, t1, message, scale = 1e-5, solver = None))]
fn embed_message(
    u0: State,
    params: &PyLorenzParams,
    t0: f64,
    t1: f64,
    message: &PySignal,
    scale: f64,
    solver: Option<PySolverConfig>,
) -> PyResult<PySignal> {
    let mut cfg = EmbedConfig::default();
    cfg.scale = scale;
    if let Some(s) = solver {
        cfg.solver = s.inner;
    }
    let secret = chaoslink_codec::embed_message(
        u0,
        params.inner,
        span(t0, t1)?,
        message.inner.clone(),
        &cfg,
    )
    .map_err(to_py_err)?;
    Ok(PySignal {
        inner: Arc::new(secret),
    })
}

/// Recover a message from a received secret signal.
#[pyfunction]
#[pyo3(signature = (u0, params, t0, t1, secret, scale = 1e5, solver = None))]
fn recover_message(
    u0: State,
    params: &PyLorenzParams,
    t0: f64,
    t1: f64,
    secret: &PySignal,
    scale: f64,
    solver: Option<PySolverConfig>,
) -> PyResult<PySignal> {
    let mut cfg = RecoverConfig::default();
    cfg.scale = scale;
    if let Some(s) = solver {
        cfg.solver = s.inner;
    }
    let recovered = chaoslink_codec::recover_message(
        u0,
        params.inner,
        span(t0, t1)?,
        secret.inner.clone(),
        &cfg,
    )
    .map_err(to_py_err)?;
    Ok(PySignal {
        inner: Arc::new(recovered),
    })
}

/// Map a bit string to its modulation step function b(t).
#[pyfunction]
#[pyo3(signature = (bits, time_length = 2.0, level_zero = 4.0, level_one = 4.4))]
fn binary_to_signal(
    bits: &str,
    time_length: f64,
    level_zero: f64,
    level_one: f64,
) -> PyResult<PySignal> {
    let modulation = BitModulation {
        time_length,
        level_zero,
        level_one,
    };
    let step = BitStepSignal::from_bits(bits, modulation).map_err(to_py_err)?;
    Ok(PySignal {
        inner: Arc::new(step),
    })
}

/// Transmit bits by parameter modulation; returns the transmitted signal.
#[pyfunction]
#[pyo3(signature = (u0, params, t0, t1, b_of_t, solver = None))]
fn embed_binary(
    u0: State,
    params: &PyLorenzParams,
    t0: f64,
    t1: f64,
    b_of_t: &PySignal,
    solver: Option<PySolverConfig>,
) -> PyResult<PySignal> {
    let cfg = solver_or_default(solver);
    let transmitted = chaoslink_codec::embed_binary(
        u0,
        params.inner,
        span(t0, t1)?,
        b_of_t.inner.clone(),
        &cfg,
    )
    .map_err(to_py_err)?;
    Ok(PySignal {
        inner: Arc::new(transmitted),
    })
}

/// Decrypt parameter modulation; returns the squared error signal.
#[pyfunction]
#[pyo3(signature = (u0, params, t0, t1, secret, solver = None))]
fn decrypt_binary(
    u0: State,
    params: &PyLorenzParams,
    t0: f64,
    t1: f64,
    secret: &PySignal,
    solver: Option<PySolverConfig>,
) -> PyResult<PySignal> {
    let cfg = solver_or_default(solver);
    let error = chaoslink_codec::decrypt_binary(
        u0,
        params.inner,
        span(t0, t1)?,
        secret.inner.clone(),
        &cfg,
    )
    .map_err(to_py_err)?;
    Ok(PySignal {
        inner: Arc::new(error),
    })
}

/// Threshold a synchronization-error signal back into bits.
#[pyfunction]
#[pyo3(signature = (error, n_bits, time_length = 2.0, threshold = 1e-3, samples_per_window = 64))]
fn threshold_bits(
    error: &PySignal,
    n_bits: usize,
    time_length: f64,
    threshold: f64,
    samples_per_window: usize,
) -> PyResult<Vec<bool>> {
    chaoslink_codec::threshold_bits(
        error.inner.as_ref(),
        n_bits,
        time_length,
        threshold,
        samples_per_window,
    )
    .map_err(to_py_err)
}

/// Solve the autonomous transmitter and return its x-component — the
/// plain synchronization drive.
#[pyfunction]
#[pyo3(signature = (u0, params, t0, t1, solver = None))]
fn transmitter_x(
    u0: State,
    params: &PyLorenzParams,
    t0: f64,
    t1: f64,
    solver: Option<PySolverConfig>,
) -> PyResult<PySignal> {
    let cfg = solver_or_default(solver);
    let traj = chaoslink_codec::transmitter_trajectory(u0, params.inner, span(t0, t1)?, &cfg)
        .map_err(to_py_err)?;
    let x = chaoslink_solver::Component::new(traj, 0).map_err(to_py_err)?;
    Ok(PySignal { inner: Arc::new(x) })
}

// ─── Audio collaborators ────────────────────────────────────────────

/// Read a WAV message; returns (signal, num_samples, sample_rate).
#[pyfunction]
#[pyo3(signature = (path, add_noise = false, std = 1.0, seed = None))]
fn read_message(
    path: PathBuf,
    add_noise: bool,
    std: f64,
    seed: Option<u64>,
) -> PyResult<(PySignal, usize, u32)> {
    let noise = if add_noise {
        Some(NoiseConfig { std, seed })
    } else {
        None
    };
    let loaded = chaoslink_audio::read_message(&path, noise.as_ref()).map_err(to_py_err)?;
    Ok((
        PySignal {
            inner: Arc::new(loaded.signal),
        },
        loaded.num_samples,
        loaded.sample_rate,
    ))
}

/// Sample a signal and write it as a mono 32-bit float WAV.
#[pyfunction]
fn write_message(
    signal: &PySignal,
    sample_rate: u32,
    num_samples: usize,
    path: PathBuf,
) -> PyResult<()> {
    chaoslink_audio::write_message(signal.inner.as_ref(), sample_rate, num_samples, &path)
        .map_err(to_py_err)
}

// ─── Module ─────────────────────────────────────────────────────────

#[pymodule]
fn chaoslink(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_class::<PyLorenzParams>()?;
    m.add_class::<PySolverConfig>()?;
    m.add_class::<PySignal>()?;
    m.add_function(wrap_pyfunction!(constant, m)?)?;
    m.add_function(wrap_pyfunction!(from_callable, m)?)?;
    m.add_function(wrap_pyfunction!(error_signal, m)?)?;
    m.add_function(wrap_pyfunction!(embed_message, m)?)?;
    m.add_function(wrap_pyfunction!(recover_message, m)?)?;
    m.add_function(wrap_pyfunction!(binary_to_signal, m)?)?;
    m.add_function(wrap_pyfunction!(embed_binary, m)?)?;
    m.add_function(wrap_pyfunction!(decrypt_binary, m)?)?;
    m.add_function(wrap_pyfunction!(threshold_bits, m)?)?;
    m.add_function(wrap_pyfunction!(transmitter_x, m)?)?;
    m.add_function(wrap_pyfunction!(read_message, m)?)?;
    m.add_function(wrap_pyfunction!(write_message, m)?)?;
    Ok(())
}
