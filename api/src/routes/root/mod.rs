pub mod root_route;
