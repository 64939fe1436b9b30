pub const VISION_SYSTEM_PROMPT: &str = "Eres un nutricionista experto en estimar el contenido nutricional de alimentos a partir de imágenes. \
Respondes únicamente con un objeto JSON válido, sin texto adicional.";

pub const PHOTO_PROMPT: &str = r#"Analiza la imagen y determina si muestra un plato de comida.

Si es un plato de comida, estima su información nutricional para la porción visible y responde con:
{"es_plato_comida": true, "datos_comida": {"nombre": "...", "cantidad": "gramos", "energia": "kcal", "carbohidratos": "gramos", "proteinas": "gramos", "fibra": "gramos", "grasa": "gramos"}}

Si no es un plato de comida, responde con:
{"es_plato_comida": false, "mensaje": "explicación breve en español"}

Los valores numéricos van sin unidades."#;

pub const BARCODE_PROMPT: &str = r#"Analiza la imagen y determina si contiene un código de barras de un producto alimenticio.

Si reconoces el código y el producto, responde con su información nutricional por porción:
{"es_codigo_barras": true, "datos_comida": {"nombre": "...", "cantidad": "gramos", "energia": "kcal", "carbohidratos": "gramos", "proteinas": "gramos", "fibra": "gramos", "grasa": "gramos"}}

Si no hay un código de barras legible o no reconoces el producto, responde con:
{"es_codigo_barras": false, "mensaje": "explicación breve en español"}

Los valores numéricos van sin unidades."#;
