use wingetup::di::ServiceContainer;
use wingetup::prompt::DialoguerInput;
use wingetup::update::{SessionOutcome, UpdateRequest, UpdateSession};

pub async fn run(request: UpdateRequest) -> SessionOutcome {
    let services = match ServiceContainer::new() {
        Ok(services) => services,
        Err(e) => return SessionOutcome::Failed(e),
    };

    println!("Quick update of a published winget package\n");
    UpdateSession::new(&services, &DialoguerInput)
        .run(&request)
        .await
}
