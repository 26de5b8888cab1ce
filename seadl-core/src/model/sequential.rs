use crate::error::SeaDlError;
use crate::nn::module::Module;
use crate::nn::parameter::Parameter;
use candle_core::Tensor;
use log::trace;

/// Runs its children one after the other, feeding each output to the next.
///
/// Children are named; parameters are reported as `"<child>.<param>"`.
#[derive(Debug, Default)]
pub struct Sequential {
    modules: Vec<(String, Box<dyn Module>)>,
}

impl Sequential {
    pub fn new() -> Self {
        Sequential {
            modules: Vec::new(),
        }
    }

    /// Appends a child under an explicit name.
    ///
    /// # Errors
    /// [`SeaDlError::InvalidConfig`] if the name is empty, contains a `.` or is
    /// already taken.
    pub fn add_module(&mut self, name: &str, module: Box<dyn Module>) -> Result<(), SeaDlError> {
        if name.is_empty() || name.contains('.') {
            return Err(SeaDlError::invalid_config(
                "Sequential",
                format!("invalid module name {:?}", name),
            ));
        }
        if self.modules.iter().any(|(n, _)| n == name) {
            return Err(SeaDlError::invalid_config(
                "Sequential",
                format!("duplicate module name {:?}", name),
            ));
        }
        self.modules.push((name.to_string(), module));
        Ok(())
    }

    /// Appends a child named after its position ("0", "1", ...).
    pub fn push(&mut self, module: Box<dyn Module>) -> Result<(), SeaDlError> {
        let name = self.modules.len().to_string();
        self.add_module(&name, module)
    }

    /// Builder-style [`Sequential::push`].
    pub fn with(mut self, module: impl Module + 'static) -> Result<Self, SeaDlError> {
        self.push(Box::new(module))?;
        Ok(self)
    }

    pub fn get(&self, name: &str) -> Option<&dyn Module> {
        self.modules
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, m)| m.as_ref())
    }

    pub fn len(&self) -> usize {
        self.modules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }
}

impl Module for Sequential {
    fn forward(&self, input: &Tensor) -> Result<Tensor, SeaDlError> {
        let mut current = input.clone();
        for (name, module) in &self.modules {
            current = module.forward(&current)?;
            trace!("Sequential: after '{}' dims {:?}", name, current.dims());
        }
        Ok(current)
    }

    fn named_parameters(&self) -> Vec<(String, &Parameter)> {
        let mut params = Vec::new();
        for (name, module) in &self.modules {
            for (param_name, param) in module.named_parameters() {
                params.push((format!("{}.{}", name, param_name), param));
            }
        }
        params
    }

    fn named_parameters_mut(&mut self) -> Vec<(String, &mut Parameter)> {
        let mut params = Vec::new();
        for (name, module) in self.modules.iter_mut() {
            for (param_name, param) in module.named_parameters_mut() {
                params.push((format!("{}.{}", name, param_name), param));
            }
        }
        params
    }

    fn named_children(&self) -> Vec<(String, &dyn Module)> {
        self.modules
            .iter()
            .map(|(name, module)| (name.clone(), module.as_ref()))
            .collect()
    }
}
