//! Fixed texts: the system instruction and every canned reply.

/// System instruction for the completion service.
pub const SYSTEM_PROMPT: &str = r#"Ты эксперт по промпт-инжинирингу. Твоя задача — создавать профессиональные промпты с нуля на основе описания задачи пользователя.

Когда пользователь описывает свою задачу, ты должен:
1. Проанализировать описание задачи и понять цель пользователя
2. Создать профессиональный, детальный промпт с нуля
3. Объяснить структуру созданного промпта

Форматируй ответ так:
**Анализ задачи:**
[Краткий анализ того, что нужно пользователю]

**Готовый промпт:**
```
[Профессиональный промпт, готовый к использованию]
```

**Структура промпта:**
[Объяснение каждого элемента промпта и почему он важен]

**Советы по использованию:**
[1-2 совета как лучше использовать этот промпт]

При создании промпта используй лучшие практики:
- Задавай роль для ИИ
- Определяй контекст и аудиторию
- Указывай формат и структуру ответа
- Добавляй конкретные требования и ограничения
- Включай примеры, если это улучшит результат

Будь полезным и образовательным. Отвечай на русском языке."#;

/// Prefix of the user-role message; the task follows verbatim.
pub const USER_INSTRUCTION_PREFIX: &str = "Создай профессиональный промпт для следующей задачи:\n\n";

pub fn user_instruction(task: &str) -> String {
    format!("{USER_INSTRUCTION_PREFIX}{task}")
}

pub const WELCOME: &str = r#"Добро пожаловать в бот Промпт-Инженер!

Я создаю профессиональные промпты с нуля на основе твоего описания задачи.

Просто опиши, для чего тебе нужен промпт, и я:
- Проанализирую твою задачу
- Создам готовый к использованию промпт
- Объясню структуру и логику промпта

**Команды:**
/start - Показать это сообщение
/help - Как правильно описать задачу
/example - Посмотреть пример работы бота

**Как использовать:**
Напиши текстом или отправь голосовое сообщение. Например:
"Мне нужен промпт для создания поста в Instagram про путешествия"
"Хочу промпт для написания продающего текста"
"Нужен промпт для генерации идей для стартапа"

Опиши свою задачу текстом или голосом — я создам для тебя промпт!"#;

pub const HELP: &str = r#"**Как описать задачу для лучшего результата:**

1. **Укажи цель** - Что должен делать промпт?
   Пример: "для написания постов в соцсети"

2. **Добавь контекст** - О чём или для кого?
   Пример: "про фитнес для начинающих"

3. **Уточни формат** - Какой результат ты ожидаешь?
   Пример: "короткий текст до 150 слов"

4. **Укажи стиль** - Какой тон нужен?
   Пример: "дружелюбный и мотивирующий"

**Примеры хороших описаний:**

"Мне нужен промпт для создания описаний товаров в интернет-магазине косметики"

"Хочу промпт для написания email-рассылки для IT-компании, тон профессиональный"

"Нужен промпт для генерации идей контента для YouTube канала про кулинарию"

Чем подробнее описание — тем лучше промпт!"#;

pub const EXAMPLE: &str = r#"**Пример работы бота:**

**Твоё описание:**
"Мне нужен промпт для создания поста в Instagram про мозаику"

**Что создаст бот:**

**Анализ задачи:**
Нужен промпт для создания визуально привлекательного поста про мозаику для Instagram.

**Готовый промпт:**
```
Ты опытный SMM-специалист и эксперт по искусству мозаики. Напиши пост для Instagram про мозаику.

Требования:
- Длина: 150-200 слов
- Начни с цепляющего вопроса или факта
- Расскажи интересный факт о мозаике
- Добавь призыв к действию
- Предложи 5-7 релевантных хештегов
- Тон: вдохновляющий и познавательный

Формат:
[Основной текст]
—
[Хештеги]
```

**Структура промпта:**
- Роль: задаёт экспертизу
- Требования: конкретные параметры
- Формат: структурирует вывод

Опиши свою задачу — создам промпт для тебя!"#;

pub const TOO_SHORT: &str = "Пожалуйста, опиши задачу подробнее.";
pub const WORKING: &str = "Создаю промпт для твоей задачи...";
pub const TRANSCRIBING: &str = "Распознаю голосовое сообщение...";
pub const TRANSCRIPT_UNUSABLE: &str = "Не удалось распознать текст. Попробуй записать ещё раз или напиши текстом.";
pub const SYNTHESIS_FAILED: &str = "Извини, произошла ошибка при создании промпта. Попробуй ещё раз.";
pub const VOICE_FAILED: &str =
    "Извини, не удалось распознать голосовое сообщение. Попробуй записать ещё раз или напиши текстом.";

/// Echo of a recognized transcript, doubling as the "synthesizing" notice.
pub fn transcript_echo(transcript: &str) -> String {
    format!("Распознано: {transcript}\n\nСоздаю промпт...")
}

/// Maximum characters of generated text delivered in one reply.
pub const MAX_REPLY_CHARS: usize = 4000;

/// Appended when a reply was cut at `MAX_REPLY_CHARS`.
pub const TRUNCATION_MARKER: &str = "...\n\n(Ответ сокращён из-за длины)";
