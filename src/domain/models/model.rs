#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ModelDescriptor {
    pub name: String,
}

impl ModelDescriptor {
    pub fn new(name: &str) -> ModelDescriptor {
        return ModelDescriptor {
            name: name.trim().to_string(),
        };
    }
}

impl From<String> for ModelDescriptor {
    fn from(name: String) -> Self {
        return ModelDescriptor::new(&name);
    }
}
