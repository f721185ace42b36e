//! User-facing text (es-ES)

pub const APP_TITLE: &str = "REVI.AI";
pub const APP_SUBTITLE: &str = "Pregúntame sobre productos y reseñas";

pub const QUESTION_PLACEHOLDER: &str = "Pregúntame sobre las reseñas...";
pub const NEW_CONVERSATION: &str = "Nueva conversación";
pub const ANSWER_APOLOGY: &str =
    "Lo siento, hubo un error al procesar tu pregunta. Por favor, inténtalo de nuevo.";

pub const SHOW_SOURCES: &str = "Ver fuentes";
pub const HIDE_SOURCES: &str = "Ocultar fuentes";
pub const SNIPPET_LABEL: &str = "Fragmento:";
pub const SIMILARITY_LABEL: &str = "Similitud:";

pub const WELCOME_TITLE: &str = "¡Hola! Soy REVI.AI";
pub const WELCOME_BODY: &str = "Pregúntame cualquier cosa sobre las reseñas de productos. \
Puedo ayudarte a encontrar información específica, resumir opiniones \
y responder preguntas sobre la experiencia de los usuarios.";
pub const SAMPLE_QUESTIONS_TITLE: &str = "Preguntas de ejemplo:";
pub const SAMPLE_QUESTIONS: [&str; 4] = [
    "¿Cuál es el mejor aspecto de este producto?",
    "¿Qué opinan los usuarios sobre la calidad?",
    "¿El producto tiene problemas de durabilidad?",
    "¿Cuáles son las quejas más comunes?",
];

// Text ingestion
pub const TEXT_TAB: &str = "📝 Pegar Reseñas";
pub const TEXT_HINT: &str = "Copia y pega las reseñas directamente en el área de texto";
pub const TEXT_EMPTY: &str = "Por favor, ingresa algunas reseñas";
pub const TEXT_BACKEND_FAILED: &str = "Error al procesar las reseñas";
pub const TEXT_UPLOAD_FAILED: &str = "Error al subir las reseñas";
pub const TEXT_UPLOADING: &str = "Procesando...";
pub const TEXT_UPLOADED: &str = "Reseñas procesadas correctamente.";

// File ingestion
pub const FILE_TAB: &str = "📄 Subir Archivo";
pub const FILE_HINT: &str = "Archivos soportados: .txt, .csv (máx. 10MB)";
pub const FILE_WRONG_TYPE: &str = "Por favor, selecciona un archivo .txt o .csv";
pub const FILE_NOT_SELECTED: &str = "Por favor, selecciona un archivo primero";
pub const FILE_UPLOADING: &str = "Subiendo archivo...";
pub const FILE_UPLOADED: &str = "¡Archivo subido exitosamente! Ya puedes hacer preguntas.";
pub const FILE_UPLOAD_FAILED: &str = "Error al subir el archivo. ";
pub const FILE_TOO_LARGE: &str = "El archivo supera el límite de 10MB.";
pub const TRY_AGAIN: &str = "Por favor, inténtalo de nuevo.";

// History
pub const HISTORY_TITLE: &str = "Historial";
pub const HISTORY_EMPTY: &str = "(Sin historial)";
pub const HISTORY_LOADING: &str = "Cargando historial...";
pub const HISTORY_FAILED: &str = "No se pudo cargar el historial";

pub fn char_count(n: usize) -> String {
    format!("{} caracteres", n)
}

pub const TEXT_PLACEHOLDER: &str = "Pega aquí las reseñas... (Enter: nueva línea, Ctrl+S: procesar)";
pub const AWAITING_ANSWER: &str = "Esperando respuesta...";
