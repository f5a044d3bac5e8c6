use actix_web::web;

pub mod routes {
    pub mod comparison;
}

mod service {
    pub(crate) mod comparison;
}

mod dtos {
    pub(crate) mod comparison;
}

pub fn mount_compare() -> actix_web::Scope {
    web::scope("/comparisons")
        .service(routes::comparison::post_comparison)
        .service(routes::comparison::get_comparison)
}
