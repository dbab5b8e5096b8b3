use anyhow::Result;

use crate::application::Categorizer;

use super::super::Container;

pub struct CategorizeController<'a> {
    container: &'a Container,
}

impl<'a> CategorizeController<'a> {
    pub fn new(container: &'a Container) -> Self {
        Self { container }
    }

    pub async fn categorize(&self, text: String) -> Result<String> {
        let categorizer = self.container.categorizer();
        Ok(categorizer.categorize(&text).await)
    }
}
