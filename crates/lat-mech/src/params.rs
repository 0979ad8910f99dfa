//! Tunable device and mechanism parameters.
//!
//! Defaults reproduce the literature models the mechanisms cite (Black's
//! equation exponents and the RAMP field-acceleration constants for EM and
//! TDDB, reaction-diffusion/hole-trapping constants for NBTI, lucky-electron
//! constants for HCI), with prefactors scaled so the four mechanisms land in
//! the same decade of MTTF at nominal conditions (1 V, 350 K, 1 GHz).
//! Absolute calibration is expected to come from a parameter file: one
//! `key<TAB>value` pair per line, `#` starts a comment, unknown keys warn
//! once and are ignored.
//!
//! ```text
//! # 7nm-class calibration
//! device.t_ox	1.1e-9
//! nbti.a	2.0e13
//! tddb.b	-0.081
//! ```

use anyhow::{anyhow, Context, Result};
use lat_core::warn_once;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Process/device geometry shared by all mechanisms.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeviceParams {
    /// Channel length, m.
    pub l: f64,
    /// PMOS threshold voltage magnitude, V.
    pub v_t0_p: f64,
    /// NMOS threshold voltage, V.
    pub v_t0_n: f64,
    /// Gate oxide thickness, m.
    pub t_ox: f64,
    /// Gate oxide capacitance per area, F/m^2.
    pub c_ox: f64,
    /// Exponent of the delay-vs-overdrive power law used to translate the
    /// relative failure criterion into an absolute ΔV_th.
    pub alpha_power_law: f64,
}

impl Default for DeviceParams {
    fn default() -> Self {
        Self {
            l: 45e-9,
            v_t0_p: 0.30,
            v_t0_n: 0.25,
            t_ox: 1.2e-9,
            c_ox: 2.88e-2,
            alpha_power_law: 1.3,
        }
    }
}

/// NBTI reaction-diffusion + hole-trapping model.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NbtiParams {
    /// Interface-trap generation prefactor.
    pub a: f64,
    /// Interface-trap voltage acceleration exponent.
    pub gamma_it: f64,
    /// Interface-trap activation energy, eV.
    pub e_a_it: f64,
    /// Hole-trapping prefactor.
    pub b: f64,
    /// Hole-trapping voltage acceleration exponent.
    pub gamma_ht: f64,
    /// Hole-trapping activation energy, eV.
    pub e_a_ht: f64,
    /// ΔV_th per trapped charge, V·m^2.
    pub delta_vth_coeff: f64,
    /// Forward-simulation step, seconds.
    pub dt: f64,
}

impl Default for NbtiParams {
    fn default() -> Self {
        Self {
            a: 1.6e13,
            gamma_it: 4.5,
            e_a_it: 0.13,
            gamma_ht: 4.5,
            b: 1.0e12,
            e_a_ht: 0.03,
            delta_vth_coeff: 0.027e-12,
            dt: 86400.0,
        }
    }
}

/// Black's equation for electromigration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmParams {
    /// Prefactor, scales the absolute MTTF.
    pub a: f64,
    /// Current-density exponent.
    pub n: f64,
    /// Activation energy, eV.
    pub e_a: f64,
    /// Interconnect cross-section width, m.
    pub width: f64,
    /// Interconnect cross-section height, m.
    pub height: f64,
}

impl Default for EmParams {
    fn default() -> Self {
        Self {
            a: 4.0e9,
            n: 1.1,
            e_a: 0.9,
            width: 2.0e-7,
            height: 3.0e-7,
        }
    }
}

/// Lucky-electron HCI model in the ExtraTime parametrisation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HciParams {
    /// Velocity-saturation field, V/m.
    pub e_sat: f64,
    /// Bulk charge factor.
    pub a_bulk: f64,
    /// Pinch-off (velocity saturation) region length, m.
    pub l: f64,
    /// Oxide-field normalization, V/m.
    pub e_0: f64,
    /// Interface-state generation barrier, eV.
    pub phi_it: f64,
    /// Hot-carrier mean free path, m.
    pub lambda: f64,
    /// ΔV_th time-power-law exponent.
    pub n: f64,
    /// Empirical prefactor inside A_HCI.
    pub k: f64,
}

impl Default for HciParams {
    fn default() -> Self {
        Self {
            e_sat: 8.0e6,
            a_bulk: 0.2,
            l: 1.7e-8,
            e_0: 8.0e8,
            phi_it: 3.7,
            lambda: 7.8e-9,
            n: 0.45,
            k: 6.0e13,
        }
    }
}

/// TDDB field/temperature acceleration (RAMP constants).
///
/// The voltage exponent is `a - b*T`; see the crate documentation of
/// [`crate::tddb`] for the sign convention.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TddbParams {
    pub a: f64,
    /// 1/K.
    pub b: f64,
    /// eV.
    pub x: f64,
    /// eV·K.
    pub y: f64,
    /// eV/K.
    pub z: f64,
}

impl Default for TddbParams {
    fn default() -> Self {
        // a/b/y/z are the RAMP values; x absorbs the (undocumented)
        // prefactor of the original fit and is rescaled to the common
        // MTTF decade.
        Self {
            a: 78.0,
            b: 0.081,
            x: 1.04,
            y: -66.8,
            z: -8.37e-4,
        }
    }
}

/// All tunables, grouped per mechanism.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MechanismParams {
    pub device: DeviceParams,
    pub nbti: NbtiParams,
    pub em: EmParams,
    pub hci: HciParams,
    pub tddb: TddbParams,
    /// Relative ΔV_th at failure (the `fail` argument default).
    pub fail_threshold: f64,
}

impl MechanismParams {
    /// Apply one `key value` override. Returns false for unknown keys.
    pub fn apply(&mut self, key: &str, value: f64) -> bool {
        match key {
            "fail" => self.fail_threshold = value,
            "device.l" => self.device.l = value,
            "device.v_t0_p" => self.device.v_t0_p = value,
            "device.v_t0_n" => self.device.v_t0_n = value,
            "device.t_ox" => self.device.t_ox = value,
            "device.c_ox" => self.device.c_ox = value,
            "device.alpha_power_law" => self.device.alpha_power_law = value,
            "nbti.a" => self.nbti.a = value,
            "nbti.gamma_it" => self.nbti.gamma_it = value,
            "nbti.e_a_it" => self.nbti.e_a_it = value,
            "nbti.b" => self.nbti.b = value,
            "nbti.gamma_ht" => self.nbti.gamma_ht = value,
            "nbti.e_a_ht" => self.nbti.e_a_ht = value,
            "nbti.delta_vth_coeff" => self.nbti.delta_vth_coeff = value,
            "nbti.dt" => self.nbti.dt = value,
            "em.a" => self.em.a = value,
            "em.n" => self.em.n = value,
            "em.e_a" => self.em.e_a = value,
            "em.width" => self.em.width = value,
            "em.height" => self.em.height = value,
            "hci.e_sat" => self.hci.e_sat = value,
            "hci.a_bulk" => self.hci.a_bulk = value,
            "hci.l" => self.hci.l = value,
            "hci.e_0" => self.hci.e_0 = value,
            "hci.phi_it" => self.hci.phi_it = value,
            "hci.lambda" => self.hci.lambda = value,
            "hci.n" => self.hci.n = value,
            "hci.k" => self.hci.k = value,
            "tddb.a" => self.tddb.a = value,
            "tddb.b" => self.tddb.b = value,
            "tddb.x" => self.tddb.x = value,
            "tddb.y" => self.tddb.y = value,
            "tddb.z" => self.tddb.z = value,
            _ => return false,
        }
        true
    }
}

impl Default for MechanismParams {
    fn default() -> Self {
        Self {
            device: DeviceParams::default(),
            nbti: NbtiParams::default(),
            em: EmParams::default(),
            hci: HciParams::default(),
            tddb: TddbParams::default(),
            fail_threshold: crate::consts::FAIL_DEFAULT,
        }
    }
}

/// Load a parameter file on top of `params`.
///
/// Format: one `key<TAB>value` pair per line; lines starting with `#` are
/// comments. Unknown keys warn (once per key) and are skipped; unparseable
/// values are fatal.
pub fn load_params_file(path: &Path, params: &mut MechanismParams) -> Result<()> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("reading parameter file '{}'", path.display()))?;
    for (index, line) in text.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let (key, value) = line
            .split_once('\t')
            .ok_or_else(|| {
                anyhow!(
                    "{}:{}: expected 'key<TAB>value', got '{line}'",
                    path.display(),
                    index + 1
                )
            })?;
        let key = key.trim();
        let value: f64 = value.trim().parse().with_context(|| {
            format!(
                "{}:{}: parsing value for parameter '{key}'",
                path.display(),
                index + 1
            )
        })?;
        if !params.apply(key, value) {
            warn_once(&format!(
                "ignoring unknown parameter '{key}' in '{}'",
                path.display()
            ));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_apply_known_keys() {
        let mut params = MechanismParams::default();
        assert!(params.apply("nbti.a", 2.5e13));
        assert!(params.apply("device.t_ox", 1.0e-9));
        assert!(params.apply("fail", 0.1));
        assert_eq!(params.nbti.a, 2.5e13);
        assert_eq!(params.device.t_ox, 1.0e-9);
        assert_eq!(params.fail_threshold, 0.1);
    }

    #[test]
    fn test_apply_unknown_key() {
        let mut params = MechanismParams::default();
        assert!(!params.apply("nbti.unknown", 1.0));
    }

    #[test]
    fn test_load_params_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "# calibration").unwrap();
        writeln!(file, "em.n\t1.5").unwrap();
        writeln!(file, "bogus.key\t3.0").unwrap();
        writeln!(file).unwrap();
        file.flush().unwrap();

        let mut params = MechanismParams::default();
        load_params_file(file.path(), &mut params).unwrap();
        assert_eq!(params.em.n, 1.5);
    }

    #[test]
    fn test_load_params_file_rejects_bad_value() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "em.n\tnot-a-number").unwrap();
        file.flush().unwrap();

        let mut params = MechanismParams::default();
        let err = load_params_file(file.path(), &mut params).unwrap_err();
        assert!(err.to_string().contains("em.n"));
    }
}
