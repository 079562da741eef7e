// Application state for HTTP handlers
use crate::application::collage_service::CollageService;

#[derive(Clone)]
pub struct AppState {
    pub collage_service: CollageService,
}
