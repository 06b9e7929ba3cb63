use std::sync::Arc;
use crate::domain::ports::{
    BookingRepository, BranchRepository, CustomerRepository, HotelRepository, RefundRepository,
    RoomRepository, RoomTypeRepository, UserRepository,
};
use crate::domain::services::{auth_service::AuthService, booking_engine::BookingEngine, catalog::CatalogService};
use crate::config::Config;

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub hotel_repo: Arc<dyn HotelRepository>,
    pub branch_repo: Arc<dyn BranchRepository>,
    pub room_type_repo: Arc<dyn RoomTypeRepository>,
    pub room_repo: Arc<dyn RoomRepository>,
    pub customer_repo: Arc<dyn CustomerRepository>,
    pub booking_repo: Arc<dyn BookingRepository>,
    pub refund_repo: Arc<dyn RefundRepository>,
    pub user_repo: Arc<dyn UserRepository>,
    pub auth_service: Arc<AuthService>,
    pub catalog: Arc<CatalogService>,
    pub booking_engine: Arc<BookingEngine>,
}

/// Repository set for one storage backend.
pub struct Repositories {
    pub hotels: Arc<dyn HotelRepository>,
    pub branches: Arc<dyn BranchRepository>,
    pub room_types: Arc<dyn RoomTypeRepository>,
    pub rooms: Arc<dyn RoomRepository>,
    pub customers: Arc<dyn CustomerRepository>,
    pub bookings: Arc<dyn BookingRepository>,
    pub refunds: Arc<dyn RefundRepository>,
    pub users: Arc<dyn UserRepository>,
}

impl AppState {
    pub fn new(config: Config, repos: Repositories) -> Self {
        let auth_service = Arc::new(AuthService::new(config.clone()));

        let catalog = Arc::new(CatalogService::new(
            repos.hotels.clone(),
            repos.branches.clone(),
            repos.room_types.clone(),
            repos.rooms.clone(),
            repos.bookings.clone(),
            repos.users.clone(),
        ));

        let booking_engine = Arc::new(BookingEngine::new(
            repos.bookings.clone(),
            repos.rooms.clone(),
            repos.room_types.clone(),
            repos.customers.clone(),
            repos.refunds.clone(),
        ));

        Self {
            config,
            hotel_repo: repos.hotels,
            branch_repo: repos.branches,
            room_type_repo: repos.room_types,
            room_repo: repos.rooms,
            customer_repo: repos.customers,
            booking_repo: repos.bookings,
            refund_repo: repos.refunds,
            user_repo: repos.users,
            auth_service,
            catalog,
            booking_engine,
        }
    }
}
