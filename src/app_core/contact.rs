use crate::{
    app_core::Overture,
    transition::Clock,
    ui_state::{FormEvent, FormField, Mode},
};
use anyhow::Result;
use tracing::{debug, info};

impl<C: Clock> Overture<C> {
    /// Starts the simulated send. Nothing leaves the machine.
    pub(crate) fn submit_contact(&mut self) -> Result<()> {
        let now = self.transitions.clock().now();
        self.ui.contact.submit(now)?;
        self.ui.set_mode(Mode::Browse);

        info!(
            subject = %self.ui.contact.value(FormField::Subject),
            "contact message submitted"
        );
        Ok(())
    }

    pub(super) fn poll_contact(&mut self) {
        let now = self.transitions.clock().now();
        for event in self.ui.contact.poll(now) {
            match event {
                FormEvent::Sent => info!("contact message sent"),
                FormEvent::Reset => debug!("contact form cleared"),
            }
        }
    }
}
