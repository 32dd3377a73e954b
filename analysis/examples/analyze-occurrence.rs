use casework_analysis::{DocumentAnalyzer, ImageAnalyzer};
use casework_sdk::{
    chat_model_from_config, keys, ApiConfiguration, MemoryStore, RecordStore, SettingsStore,
};

const OCCURRENCE_TEXT: &str = "Boletim de ocorrência 4521/2024. Furto de veículo Gol branco, \
placa ABC-1234, na Rua das Flores, madrugada de 12/03/2024. Testemunha: José da Silva.";

#[tokio::main]
async fn main() {
    // Demo configuration: no API key needed, canned replies.
    let storage = MemoryStore::new();
    let settings = SettingsStore::new(&storage);
    settings
        .write(&ApiConfiguration {
            mock_mode: true,
            ..Default::default()
        })
        .unwrap();

    let config = settings.read();
    let chat = chat_model_from_config(&config).unwrap();
    let records = RecordStore::new(&storage);

    let documents = DocumentAnalyzer::new(chat.as_ref(), &config.language);
    let record = documents
        .analyze("case-1", "bo-4521.pdf", OCCURRENCE_TEXT)
        .await
        .unwrap();
    println!("document summary ({:?}): {}", record.confidence, record.output.summary);
    records.upsert(keys::DOCUMENTS, record).unwrap();

    let images = ImageAnalyzer::new(chat.as_ref(), &config.language);
    let record = images
        .analyze("case-1", "foto-local.jpg", b"raw image bytes", "image/jpeg")
        .await
        .unwrap();
    println!("plates found: {:?}", record.output.plates);
    records.upsert(keys::IMAGES, record).unwrap();
}
