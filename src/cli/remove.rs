use wingetup::di::ServiceContainer;
use wingetup::prompt::DialoguerInput;
use wingetup::remove::{self, RemoveRequest};
use wingetup::update::SessionOutcome;

pub async fn run(request: RemoveRequest) -> SessionOutcome {
    let services = match ServiceContainer::new() {
        Ok(services) => services,
        Err(e) => return SessionOutcome::Failed(e),
    };

    remove::run(&services, &DialoguerInput, &request).await
}
