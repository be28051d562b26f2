//! Client-streamed uploads: one metadata message plus photo chunks.

use tokio_stream::{Stream, StreamExt};
use tonic::Status;

use proto::catalog::v1::{create_service_request, update_service_request, CreateServiceRequest, ServiceDataForCreate, ServiceDataForUpdate, UpdateServiceRequest};

pub enum UploadPart<D> {
    Data(D),
    Photo(Vec<u8>),
}

/// A streamed request message carrying either metadata or photo bytes.
pub trait PhotoChunk {
    type Data;

    /// `None` for a message with no payload set.
    fn into_part(self) -> Option<UploadPart<Self::Data>>;
}

impl PhotoChunk for CreateServiceRequest {
    type Data = ServiceDataForCreate;

    fn into_part(self) -> Option<UploadPart<ServiceDataForCreate>> {
        match self.payload? {
            create_service_request::Payload::ServiceDataForCreate(d) => Some(UploadPart::Data(d)),
            create_service_request::Payload::ServicePhoto(bytes) => Some(UploadPart::Photo(bytes)),
        }
    }
}

impl PhotoChunk for UpdateServiceRequest {
    type Data = ServiceDataForUpdate;

    fn into_part(self) -> Option<UploadPart<ServiceDataForUpdate>> {
        match self.payload? {
            update_service_request::Payload::ServiceDataForUpdate(d) => Some(UploadPart::Data(d)),
            update_service_request::Payload::ServicePhoto(bytes) => Some(UploadPart::Photo(bytes)),
        }
    }
}

#[derive(Debug)]
pub struct Upload<D> {
    /// Last metadata message seen, if any.
    pub data: Option<D>,
    /// All photo chunks concatenated in arrival order.
    pub photo: Vec<u8>,
}

/// Drain the stream before anything is persisted. The first stream error aborts.
pub async fn collect_upload<S, T>(mut stream: S) -> Result<Upload<T::Data>, Status>
where
    S: Stream<Item = Result<T, Status>> + Unpin,
    T: PhotoChunk,
{
    let mut upload = Upload { data: None, photo: Vec::new() };
    while let Some(message) = stream.next().await {
        match message?.into_part() {
            Some(UploadPart::Data(d)) => upload.data = Some(d),
            Some(UploadPart::Photo(bytes)) => upload.photo.extend_from_slice(&bytes),
            None => {}
        }
    }
    Ok(upload)
}
