//! Generated gRPC types: the catalog service we serve and the sibling
//! services we call.

pub mod catalog {
    pub mod v1 {
        tonic::include_proto!("catalog.v1");
    }
}

pub mod coach {
    pub mod v1 {
        tonic::include_proto!("coach.v1");
    }
}

pub mod abonement {
    pub mod v1 {
        tonic::include_proto!("abonement.v1");
    }
}
