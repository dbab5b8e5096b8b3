use anyhow::{bail, Result};

use crate::domain::NewComplaint;
use crate::Commands;

use super::container::Container;
use super::controller::{
    CategorizeController, ChatController, ListController, StatusController, SubmitController,
    TriageController,
};

pub struct Router<'a> {
    chat_controller: ChatController<'a>,
    categorize_controller: CategorizeController<'a>,
    triage_controller: TriageController<'a>,
    status_controller: StatusController<'a>,
    submit_controller: SubmitController<'a>,
    list_controller: ListController<'a>,
}

impl<'a> Router<'a> {
    pub fn new(container: &'a Container) -> Self {
        Self {
            chat_controller: ChatController::new(container),
            categorize_controller: CategorizeController::new(container),
            triage_controller: TriageController::new(container),
            status_controller: StatusController::new(container),
            submit_controller: SubmitController::new(container),
            list_controller: ListController::new(container),
        }
    }

    pub async fn route(&self, command: Commands) -> Result<String> {
        match command {
            Commands::Chat { message } => self.chat_controller.chat(message).await,
            Commands::Categorize { text } => self.categorize_controller.categorize(text).await,
            Commands::Triage { .. } => self.triage_controller.triage().await,
            Commands::SetStatus { id, status, .. } => {
                self.status_controller.set_status(id, status).await
            }
            Commands::Submit {
                user,
                title,
                description,
                category,
                room,
                lab,
                image_url,
                ..
            } => {
                self.submit_controller
                    .submit(NewComplaint {
                        user_id: user,
                        title,
                        description,
                        category,
                        room,
                        which_lab: lab,
                        image_url,
                    })
                    .await
            }
            Commands::List { user, .. } => self.list_controller.list(user).await,
            Commands::Serve { .. } => bail!("serve is handled by the relay, not the router"),
        }
    }
}
