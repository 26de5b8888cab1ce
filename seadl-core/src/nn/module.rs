use crate::error::SeaDlError;
use crate::nn::Parameter;
use candle_core::{DType, Device, Tensor};
use std::collections::HashMap;
use std::fmt::Write;

/// The base trait for all neural network modules (layers, containers, models).
///
/// A module owns its parameters and its child modules. Implementors provide
/// the forward pass and register their parameters by name; everything else
/// (parameter collection, device and dtype moves, loading values, the
/// printable description) is derived from those.
pub trait Module: std::fmt::Debug + Send + Sync {
    /// Performs a forward pass of the module.
    ///
    /// # Arguments
    /// * `input`: A reference to the input `Tensor` for the module.
    ///
    /// # Returns
    /// A `Result` containing the output `Tensor` of the module, or a `SeaDlError`
    /// if an error occurs during the forward pass.
    fn forward(&self, input: &Tensor) -> Result<Tensor, SeaDlError>;

    /// Returns all learnable parameters of the module along with their names.
    ///
    /// Names should be unique within the module and follow a hierarchical
    /// structure for nested modules (e.g., "layer1.weight", "layer1.bias").
    fn named_parameters(&self) -> Vec<(String, &Parameter)>;

    /// Mutable counterpart of [`Module::named_parameters`], same names and order.
    fn named_parameters_mut(&mut self) -> Vec<(String, &mut Parameter)>;

    /// Returns all learnable parameters of the module, including those of sub-modules.
    fn parameters(&self) -> Vec<&Parameter> {
        self.named_parameters()
            .into_iter()
            .map(|(_, p)| p)
            .collect()
    }

    fn parameters_mut(&mut self) -> Vec<&mut Parameter> {
        self.named_parameters_mut()
            .into_iter()
            .map(|(_, p)| p)
            .collect()
    }

    /// Total number of scalar values across all parameters.
    fn num_parameters(&self) -> usize {
        self.parameters().iter().map(|p| p.numel()).sum()
    }

    /// Returns a vector of direct child `Module`s.
    fn children(&self) -> Vec<&dyn Module> {
        self.named_children()
            .into_iter()
            .map(|(_, m)| m)
            .collect()
    }

    /// Returns a vector of direct child `Module`s along with their names.
    /// Leaf modules have no children.
    fn named_children(&self) -> Vec<(String, &dyn Module)> {
        Vec::new()
    }

    /// Short type name used by [`describe`].
    fn name(&self) -> String {
        let full = std::any::type_name::<Self>();
        full.rsplit("::").next().unwrap_or(full).to_string()
    }

    /// Layer-specific details shown between the parentheses by [`describe`].
    fn extra_repr(&self) -> String {
        String::new()
    }

    /// Moves every parameter of the module to `device`.
    fn to_device(&mut self, device: &Device) -> Result<(), SeaDlError> {
        for param in self.parameters_mut() {
            param.to_device(device)?;
        }
        Ok(())
    }

    /// Casts every parameter of the module to `dtype`.
    fn to_dtype(&mut self, dtype: DType) -> Result<(), SeaDlError> {
        for param in self.parameters_mut() {
            param.to_dtype(dtype)?;
        }
        Ok(())
    }

    /// Copies the current value of every parameter, keyed by name.
    fn state_dict(&self) -> Result<HashMap<String, Tensor>, SeaDlError> {
        let mut state = HashMap::new();
        for (name, param) in self.named_parameters() {
            state.insert(name, param.tensor().copy()?);
        }
        Ok(state)
    }

    /// Overwrites parameters from a name -> tensor map.
    ///
    /// Parameters missing from `tensors` keep their value.
    ///
    /// # Errors
    /// * [`SeaDlError::UnknownParameter`] if a name is not registered by the module.
    /// * [`SeaDlError::ShapeMismatch`] if a tensor does not have the parameter's shape.
    ///
    /// Nothing is written when an error is returned.
    fn load_parameters(&mut self, tensors: &HashMap<String, Tensor>) -> Result<(), SeaDlError> {
        let params = self.named_parameters_mut();
        if let Some(unknown) = tensors
            .keys()
            .find(|name| !params.iter().any(|(n, _)| n == *name))
        {
            return Err(SeaDlError::UnknownParameter(unknown.clone()));
        }
        for (name, param) in &params {
            if let Some(value) = tensors.get(name) {
                if value.dims() != param.dims() {
                    return Err(SeaDlError::ShapeMismatch {
                        expected: param.dims().to_vec(),
                        actual: value.dims().to_vec(),
                        operation: format!("load_parameters({})", name),
                    });
                }
            }
        }
        for (name, param) in params {
            if let Some(value) = tensors.get(&name) {
                param.set(value)?;
            }
        }
        Ok(())
    }
}

/// Depth-first list of `root` and all of its descendants, `root` first.
pub fn modules(root: &dyn Module) -> Vec<&dyn Module> {
    let mut all = vec![root];
    for child in root.children() {
        all.extend(modules(child));
    }
    all
}

/// Renders the module tree:
///
/// ```text
/// SimpleMLP(
///   (flatten): Flatten(start_dim=1, end_dim=-1)
///   (linear1): Linear(in_features=784, out_features=100, bias=true)
/// )
/// ```
pub fn describe(module: &dyn Module) -> String {
    let mut out = String::new();
    write_module(&mut out, module, 0);
    out
}

fn write_module(out: &mut String, module: &dyn Module, depth: usize) {
    let children = module.named_children();
    let extra = module.extra_repr();
    if children.is_empty() {
        let _ = write!(out, "{}({})", module.name(), extra);
        return;
    }
    let indent = "  ".repeat(depth + 1);
    let _ = writeln!(out, "{}(", module.name());
    if !extra.is_empty() {
        let _ = writeln!(out, "{}{}", indent, extra);
    }
    for (name, child) in children {
        let _ = write!(out, "{}({}): ", indent, name);
        write_module(out, child, depth + 1);
        out.push('\n');
    }
    let _ = write!(out, "{})", "  ".repeat(depth));
}
