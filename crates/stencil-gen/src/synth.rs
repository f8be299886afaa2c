use std::collections::HashSet;

use stencil_model::{DescriptorError, Emission, MethodDescriptor, Parameter};
use thiserror::Error;

/// Upper bound on the optional-parameter count for the power-set enumeration.
///
/// Descriptors whose optional parameters all share one type never hit this
/// bound: they take the linear trailing-omission path instead.
pub const MAX_OPTIONAL_PARAMS: usize = 16;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SynthesisError {
    #[error(transparent)]
    Descriptor(#[from] DescriptorError),
    #[error(
        "`{method}` has {count} optional parameters of differing types; at most {} are supported",
        MAX_OPTIONAL_PARAMS
    )]
    TooManyOptionalParams { method: String, count: usize },
}

/// Compute the ordered overload set for one method.
///
/// Candidates are enumerated in ascending mask order over the optional
/// parameters (bit *i* set = optional parameter *i* is kept), the all-kept
/// mask excluded. Candidates whose kept-parameter type sequence duplicates an
/// earlier candidate's are dropped, so no two emitted overloads share a type
/// signature and none restates the original. The resulting order is part of
/// the contract: identical input yields identical, byte-stable output.
///
/// A method with no optional parameters yields an empty vector.
pub fn synthesize(method: &MethodDescriptor) -> Result<Vec<Emission>, SynthesisError> {
    let (required, optional) = method.partition()?;
    if optional.is_empty() {
        return Ok(Vec::new());
    }

    let k = optional.len();
    let homogeneous = optional.iter().all(|p| p.ty == optional[0].ty);

    let emissions = if homogeneous {
        trailing_omission_candidates(required, optional)
    } else {
        if k > MAX_OPTIONAL_PARAMS {
            return Err(SynthesisError::TooManyOptionalParams {
                method: method.qualified_name(),
                count: k,
            });
        }
        enumerated_candidates(required, optional)
    };

    tracing::debug!(
        method = %method.qualified_name(),
        optional = k,
        overloads = emissions.len(),
        "synthesized overload set"
    );

    Ok(emissions)
}

/// Fast path for optional parameters that all share one type.
///
/// Every same-size subset of one type collapses to the same type signature,
/// and ascending-mask first-wins always lands on the subset keeping the
/// *leading* optional parameters. So the survivors are exactly the candidates
/// that keep the first `kept` optional parameters for `kept = 0 .. k-1`,
/// already in ascending mask order.
fn trailing_omission_candidates(required: &[Parameter], optional: &[Parameter]) -> Vec<Emission> {
    (0..optional.len())
        .map(|kept| emission(required, optional, |i| i < kept))
        .collect()
}

/// General path: every mask except the all-kept one, first-wins dedup on the
/// kept-parameter type sequence.
fn enumerated_candidates(required: &[Parameter], optional: &[Parameter]) -> Vec<Emission> {
    let full = (1u32 << optional.len()) - 1;
    let mut seen = HashSet::new();

    (0..full)
        .filter(|&mask| {
            let signature: Vec<&str> = optional
                .iter()
                .enumerate()
                .filter(|&(i, _)| mask & (1 << i) != 0)
                .map(|(_, p)| p.ty.as_str())
                .collect();
            seen.insert(signature)
        })
        .map(|mask| emission(required, optional, |i| mask & (1 << i) != 0))
        .collect()
}

fn emission(
    required: &[Parameter],
    optional: &[Parameter],
    kept: impl Fn(usize) -> bool,
) -> Emission {
    let mut signature_params: Vec<Parameter> = required.to_vec();
    let mut call_args: Vec<String> = required.iter().map(|p| p.name.clone()).collect();

    for (i, param) in optional.iter().enumerate() {
        if kept(i) {
            signature_params.push(param.clone());
            call_args.push(param.name.clone());
        } else {
            let default = param
                .default
                .clone()
                .expect("optional parameter carries a default after partition");
            call_args.push(default);
        }
    }

    Emission {
        signature_params,
        call_args,
    }
}
